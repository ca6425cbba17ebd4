//! In-memory stand-ins for the backend, shared by the unit tests.

use crate::api::{ApiError, AssignmentService};
use crate::models::{AssignmentReport, SubmissionEntry};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn sample_report() -> AssignmentReport {
    AssignmentReport {
        assignment_title: "Essay 3".to_string(),
        description: "Write about borrow checking".to_string(),
        due_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        assignment_file: Some("https://files.example.com/brief.pdf".to_string()),
        submission_date: None,
        submitted_file_link: None,
        total_marks: 50.0,
        marks: None,
        rating: None,
        remark: None,
    }
}

pub fn submitted_report() -> AssignmentReport {
    let mut report = sample_report();
    report.submission_date = Some(Utc.with_ymd_and_hms(2024, 5, 28, 12, 30, 0).unwrap());
    report.submitted_file_link = Some("https://files.example.com/answer.pdf".to_string());
    report
}

pub fn graded_report() -> AssignmentReport {
    let mut report = submitted_report();
    report.marks = Some(45.0);
    report.rating = Some("Good".to_string());
    report.remark = Some("Solid work".to_string());
    report
}

fn backend_error(op: &str) -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        url: format!("http://fake-lms/{}", op),
        body: "internal error".to_string(),
    }
}

/// Backend fake: one mutable report slot, call counters, and failure toggles.
pub struct FakeService {
    pub report: Mutex<Option<AssignmentReport>>,
    pub submissions: Vec<SubmissionEntry>,
    pub fail_reads: bool,
    pub fail_submit: bool,
    pub fail_unsubmit: bool,
    pub submit_calls: AtomicUsize,
    pub unsubmit_calls: AtomicUsize,
}

impl FakeService {
    pub fn with_report(report: Option<AssignmentReport>) -> Self {
        Self {
            report: Mutex::new(report),
            submissions: Vec::new(),
            fail_reads: false,
            fail_submit: false,
            fail_unsubmit: false,
            submit_calls: AtomicUsize::new(0),
            unsubmit_calls: AtomicUsize::new(0),
        }
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn unsubmit_calls(&self) -> usize {
        self.unsubmit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssignmentService for FakeService {
    async fn get_report(
        &self,
        _assignment_id: &str,
        _user_id: &str,
    ) -> Result<Option<AssignmentReport>, ApiError> {
        if self.fail_reads {
            return Err(backend_error("report"));
        }
        Ok(self.report.lock().unwrap().clone())
    }

    async fn submit(&self, _assignment_id: &str, file_link: &str) -> Result<(), ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit {
            return Err(backend_error("submit"));
        }
        let mut slot = self.report.lock().unwrap();
        let mut report = slot.take().unwrap_or_else(sample_report);
        report.submission_date = Some(Utc::now());
        report.submitted_file_link = Some(file_link.to_string());
        *slot = Some(report);
        Ok(())
    }

    async fn unsubmit(&self, _assignment_id: &str) -> Result<(), ApiError> {
        self.unsubmit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unsubmit {
            return Err(backend_error("unsubmit"));
        }
        if let Some(report) = self.report.lock().unwrap().as_mut() {
            report.submission_date = None;
            report.submitted_file_link = None;
            report.marks = None;
            report.rating = None;
            report.remark = None;
        }
        Ok(())
    }

    async fn list_submissions(
        &self,
        _assignment_id: &str,
    ) -> Result<Vec<SubmissionEntry>, ApiError> {
        if self.fail_reads {
            return Err(backend_error("submissions"));
        }
        Ok(self.submissions.clone())
    }
}
