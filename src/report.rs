use crate::api::AssignmentService;
use crate::models::AssignmentReport;

/// Result of the most recent report fetch. `Pending` exists only before the
/// first fetch resolves.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Pending,
    Found(AssignmentReport),
    NotFound,
    TransportError(String),
}

/// Fetch the report for `(assignment_id, user_id)` and fold the transport
/// result into an outcome. Absence (404) is a distinct, non-error outcome.
/// Read-only and safe to call repeatedly.
pub async fn fetch_report(
    service: &dyn AssignmentService,
    assignment_id: &str,
    user_id: &str,
) -> FetchOutcome {
    match service.get_report(assignment_id, user_id).await {
        Ok(Some(report)) => FetchOutcome::Found(report),
        Ok(None) => FetchOutcome::NotFound,
        Err(e) => FetchOutcome::TransportError(format!("Failed to load assignment details: {}", e)),
    }
}
