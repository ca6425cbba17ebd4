use crate::api::ApiError;
use crate::models::{AssignmentReport, SubmissionEntry};
use async_trait::async_trait;

/// The backend surface consumed by the assignment detail view. The real
/// implementation is [`crate::api::LmsClient`]; tests substitute in-memory
/// fakes.
#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Read the report for `(assignment_id, user_id)`. `Ok(None)` means the
    /// backend answered 404: no report exists yet, which is not an error.
    async fn get_report(
        &self,
        assignment_id: &str,
        user_id: &str,
    ) -> Result<Option<AssignmentReport>, ApiError>;

    /// Submit a file link as the current user's answer.
    async fn submit(&self, assignment_id: &str, file_link: &str) -> Result<(), ApiError>;

    /// Withdraw the current user's submission.
    async fn unsubmit(&self, assignment_id: &str) -> Result<(), ApiError>;

    /// List all submissions for an assignment (trainer view).
    async fn list_submissions(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionEntry>, ApiError>;
}
