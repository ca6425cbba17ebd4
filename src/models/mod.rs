use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// LMS API Models
// ============================================================================

/// Per-user, per-assignment record combining assignment metadata and
/// submission/grading status. The backend serves camelCase JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentReport {
    pub assignment_title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub assignment_file: Option<String>,
    pub submission_date: Option<DateTime<Utc>>,
    pub submitted_file_link: Option<String>,
    pub total_marks: f64,
    pub marks: Option<f64>,
    pub rating: Option<String>,
    pub remark: Option<String>,
}

impl AssignmentReport {
    pub fn is_submitted(&self) -> bool {
        self.submission_date.is_some()
    }

    pub fn is_graded(&self) -> bool {
        self.marks.is_some()
    }
}

/// One row of the trainer's per-assignment submissions list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEntry {
    pub student_id: String,
    pub student_name: String,
    pub submission_date: Option<DateTime<Utc>>,
    pub submitted_file_link: Option<String>,
    pub marks: Option<f64>,
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Trainer,
}

/// What a role is allowed to do on the assignment detail page. Collapses the
/// two near-identical pages into one parameterized view.
#[derive(Debug, Clone, Copy)]
pub struct RoleCapabilities {
    pub can_submit: bool,
    pub can_view_submissions: bool,
}

impl Role {
    pub fn capabilities(self) -> RoleCapabilities {
        match self {
            Role::Student => RoleCapabilities {
                can_submit: true,
                can_view_submissions: false,
            },
            Role::Trainer => RoleCapabilities {
                can_submit: false,
                can_view_submissions: true,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Trainer => "Trainer",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "trainer" => Ok(Role::Trainer),
            other => Err(format!(
                "Unknown role '{}'. Expected 'student' or 'trainer'",
                other
            )),
        }
    }
}
