use crate::models::{AssignmentReport, SubmissionEntry};
use crate::report::FetchOutcome;
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What the page renders. Exactly one state holds at a time.
#[derive(Debug, Clone)]
pub enum ViewState {
    Loading,
    Error {
        message: String,
    },
    NotFound,
    Loaded {
        report: AssignmentReport,
        submission: SubmissionView,
    },
}

/// Submission panel sub-state nested inside `Loaded`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionView {
    Unsubmitted,
    SubmittedUngraded,
    SubmittedGraded { progress: Option<u16> },
}

impl ViewState {
    /// Pure mapping from the fetch status to a render state.
    pub fn resolve(is_loading: bool, outcome: &FetchOutcome) -> ViewState {
        if is_loading {
            return ViewState::Loading;
        }
        match outcome {
            FetchOutcome::Pending => ViewState::Loading,
            FetchOutcome::TransportError(message) => ViewState::Error {
                message: message.clone(),
            },
            FetchOutcome::NotFound => ViewState::NotFound,
            FetchOutcome::Found(report) => ViewState::Loaded {
                submission: SubmissionView::of(report),
                report: report.clone(),
            },
        }
    }
}

impl SubmissionView {
    pub fn of(report: &AssignmentReport) -> SubmissionView {
        if !report.is_submitted() {
            return SubmissionView::Unsubmitted;
        }
        match report.marks {
            None => SubmissionView::SubmittedUngraded,
            Some(marks) => SubmissionView::SubmittedGraded {
                progress: progress_percent(marks, report.total_marks),
            },
        }
    }
}

/// Score percentage, rounded and clamped to [0, 100]. `None` when the
/// assignment carries no marks to score against (rendered as "N/A").
pub fn progress_percent(marks: f64, total_marks: f64) -> Option<u16> {
    if total_marks <= 0.0 {
        return None;
    }
    let percent = (marks / total_marks * 100.0).round();
    Some(percent.clamp(0.0, 100.0) as u16)
}

/// Submit/unsubmit progress. New actions are rejected while one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Submitting,
    Unsubmitting,
}

impl ActionState {
    pub fn is_idle(self) -> bool {
        self == ActionState::Idle
    }
}

/// The file-link submission dialog. Single text field, edited in place.
#[derive(Debug, Clone, Default)]
pub struct SubmitDialog {
    pub file_link: String,
}

impl SubmitDialog {
    pub fn push_char(&mut self, c: char) {
        if self.file_link.len() < 500 {
            self.file_link.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.file_link.pop();
    }
}

/// Trainer-only list of all submissions for the assignment. Rows are keyed by
/// student id: the backend holds at most one report per student, and a
/// duplicate row replaces the earlier one in place.
#[derive(Debug, Clone)]
pub struct SubmissionsPane {
    pub rows: IndexMap<String, SubmissionEntry>,
    pub selected_index: usize,
    pub exported_to: Option<String>,
}

impl SubmissionsPane {
    pub fn new(entries: Vec<SubmissionEntry>) -> Self {
        let mut rows = IndexMap::new();
        for entry in entries {
            rows.insert(entry.student_id.clone(), entry);
        }
        Self {
            rows,
            selected_index: 0,
            exported_to: None,
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected_index < self.rows.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }
}

/// Rolling in-app activity log shown alongside the page.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    messages: Vec<String>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            messages: vec![format!("{} Ready", Utc::now().format("%H:%M:%S"))],
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages
            .push(format!("{} {}", Utc::now().format("%H:%M:%S"), message.into()));
        // Keep only the last 20 messages to avoid memory issues
        if self.messages.len() > 20 {
            self.messages.remove(0);
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide busy flag behind every network call. `acquire` returns a
/// guard that releases on drop, so the flag clears on every exit path.
#[derive(Clone, Default)]
pub struct Loader {
    active: Arc<AtomicUsize>,
}

impl Loader {
    pub fn acquire(&self) -> LoaderGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        LoaderGuard {
            active: Arc::clone(&self.active),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }
}

pub struct LoaderGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for LoaderGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{graded_report, sample_report, submitted_report};

    #[test]
    fn test_unsubmitted_regardless_of_stray_grading_fields() {
        // submissionDate absent wins even if the backend ever violated its
        // own invariant and sent marks alongside.
        let mut report = sample_report();
        report.marks = Some(45.0);
        report.rating = Some("Good".to_string());
        assert_eq!(SubmissionView::of(&report), SubmissionView::Unsubmitted);
    }

    #[test]
    fn test_submitted_without_marks_is_ungraded() {
        assert_eq!(
            SubmissionView::of(&submitted_report()),
            SubmissionView::SubmittedUngraded
        );
    }

    #[test]
    fn test_graded_progress_is_rounded_percentage() {
        // 45 / 50 -> 90
        assert_eq!(
            SubmissionView::of(&graded_report()),
            SubmissionView::SubmittedGraded { progress: Some(90) }
        );
    }

    #[test]
    fn test_progress_rounds_and_clamps() {
        assert_eq!(progress_percent(1.0, 3.0), Some(33));
        assert_eq!(progress_percent(2.0, 3.0), Some(67));
        assert_eq!(progress_percent(60.0, 50.0), Some(100));
        assert_eq!(progress_percent(-5.0, 50.0), Some(0));
    }

    #[test]
    fn test_zero_total_marks_has_no_progress() {
        assert_eq!(progress_percent(10.0, 0.0), None);

        let mut report = graded_report();
        report.total_marks = 0.0;
        assert_eq!(
            SubmissionView::of(&report),
            SubmissionView::SubmittedGraded { progress: None }
        );
    }

    #[test]
    fn test_loading_wins_over_any_outcome() {
        let outcome = FetchOutcome::Found(sample_report());
        assert!(matches!(
            ViewState::resolve(true, &outcome),
            ViewState::Loading
        ));
        assert!(matches!(
            ViewState::resolve(false, &FetchOutcome::Pending),
            ViewState::Loading
        ));
    }

    #[test]
    fn test_outcomes_map_to_render_states() {
        assert!(matches!(
            ViewState::resolve(false, &FetchOutcome::NotFound),
            ViewState::NotFound
        ));
        assert!(matches!(
            ViewState::resolve(false, &FetchOutcome::TransportError("down".to_string())),
            ViewState::Error { .. }
        ));
        match ViewState::resolve(false, &FetchOutcome::Found(graded_report())) {
            ViewState::Loaded { submission, .. } => {
                assert_eq!(
                    submission,
                    SubmissionView::SubmittedGraded { progress: Some(90) }
                );
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_submissions_pane_dedups_by_student() {
        let mut first = crate::models::SubmissionEntry {
            student_id: "s1".to_string(),
            student_name: "Avery".to_string(),
            submission_date: None,
            submitted_file_link: None,
            marks: None,
        };
        let second = crate::models::SubmissionEntry {
            marks: Some(40.0),
            ..first.clone()
        };
        first.student_name = "Avery Jones".to_string();

        let pane = SubmissionsPane::new(vec![first, second]);
        assert_eq!(pane.rows.len(), 1);
        assert_eq!(pane.rows["s1"].marks, Some(40.0));
    }

    #[test]
    fn test_loader_guard_releases_on_drop() {
        let loader = Loader::default();
        assert!(!loader.is_busy());
        {
            let _outer = loader.acquire();
            let inner = loader.acquire();
            assert!(loader.is_busy());
            drop(inner);
            assert!(loader.is_busy());
        }
        assert!(!loader.is_busy());
    }
}
