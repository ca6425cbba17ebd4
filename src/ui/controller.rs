use crate::api::AssignmentService;
use crate::models::Role;
use crate::ui::state::{ActionState, Loader, SubmitDialog};

/// What the app should do once an action has run.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The backend accepted the action; re-fetch the report.
    Refresh,
    /// The backend rejected the action; message goes to the shared error slot.
    Failed(String),
    /// Nothing happened: role-gated, busy, or preconditions unmet.
    Ignored,
}

/// Orchestrates submit/unsubmit for the current role. Both actions stay wired
/// for the trainer but are inert: the handlers never reach the network.
pub struct SubmissionController {
    role: Role,
    pub action: ActionState,
    pub dialog: Option<SubmitDialog>,
}

impl SubmissionController {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            action: ActionState::Idle,
            dialog: None,
        }
    }

    /// Open the file-link dialog. Returns false when the role cannot submit
    /// or an action is already in flight.
    pub fn open_dialog(&mut self) -> bool {
        if !self.role.capabilities().can_submit || !self.action.is_idle() {
            return false;
        }
        if self.dialog.is_none() {
            self.dialog = Some(SubmitDialog::default());
        }
        true
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Submit the dialog's file link. Preconditions: student role, idle,
    /// dialog open with a non-empty link. The dialog closes whether the call
    /// succeeds or fails, matching the shipped page.
    pub async fn submit(
        &mut self,
        service: &dyn AssignmentService,
        assignment_id: &str,
        loader: &Loader,
    ) -> ActionOutcome {
        if !self.role.capabilities().can_submit {
            return ActionOutcome::Ignored;
        }
        if !self.action.is_idle() {
            return ActionOutcome::Ignored;
        }
        let file_link = match &self.dialog {
            Some(dialog) if !dialog.file_link.trim().is_empty() => {
                dialog.file_link.trim().to_string()
            }
            _ => return ActionOutcome::Ignored,
        };

        self.action = ActionState::Submitting;
        let result = {
            let _busy = loader.acquire();
            service.submit(assignment_id, &file_link).await
        };
        self.action = ActionState::Idle;
        self.dialog = None;

        match result {
            Ok(()) => ActionOutcome::Refresh,
            Err(e) => ActionOutcome::Failed(format!("Failed to submit assignment: {}", e)),
        }
    }

    /// Withdraw the current submission. No dialog involved.
    pub async fn unsubmit(
        &mut self,
        service: &dyn AssignmentService,
        assignment_id: &str,
        loader: &Loader,
    ) -> ActionOutcome {
        if !self.role.capabilities().can_submit {
            // Not implemented for the trainer role.
            return ActionOutcome::Ignored;
        }
        if !self.action.is_idle() {
            return ActionOutcome::Ignored;
        }

        self.action = ActionState::Unsubmitting;
        let result = {
            let _busy = loader.acquire();
            service.unsubmit(assignment_id).await
        };
        self.action = ActionState::Idle;

        match result {
            Ok(()) => ActionOutcome::Refresh,
            Err(e) => ActionOutcome::Failed(format!("Failed to unsubmit assignment: {}", e)),
        }
    }
}
