use crate::api::AssignmentService;
use crate::export;
use crate::models::Role;
use crate::report::{self, FetchOutcome};
use crate::ui::controller::{ActionOutcome, SubmissionController};
use crate::ui::render::render_ui;
use crate::ui::state::{ActivityLog, Loader, SubmissionsPane, ViewState};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::task::JoinHandle;

struct PendingFetch {
    generation: u64,
    handle: JoinHandle<FetchOutcome>,
}

pub struct App<S: AssignmentService + 'static> {
    service: Arc<S>,
    role: Role,
    assignment_id: String,
    user_id: String,
    class_id: Option<String>,
    loader: Loader,
    log: ActivityLog,
    outcome: FetchOutcome,
    fetch_gen: u64,
    pending_fetch: Option<PendingFetch>,
    controller: SubmissionController,
    error: Option<String>,
    submissions: Option<SubmissionsPane>,
}

impl<S: AssignmentService + 'static> App<S> {
    pub fn new(
        service: S,
        role: Role,
        assignment_id: String,
        user_id: String,
        class_id: Option<String>,
    ) -> Self {
        let mut log = ActivityLog::new();
        log.push(format!("Viewing as {}", role.label()));

        Self {
            service: Arc::new(service),
            role,
            assignment_id,
            user_id,
            class_id,
            loader: Loader::default(),
            log,
            outcome: FetchOutcome::Pending,
            fetch_gen: 0,
            pending_fetch: None,
            controller: SubmissionController::new(role),
            error: None,
            submissions: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Kick off the initial report fetch
        self.start_fetch();

        // Main event loop
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            self.poll_fetch().await;

            let view = self.current_view();
            terminal.draw(|f| {
                render_ui(
                    f,
                    &view,
                    self.submissions.as_ref(),
                    self.controller.dialog.as_ref(),
                    self.role,
                    self.loader.is_busy(),
                    &self.log,
                )
            })?;

            // Check for keyboard events with a short timeout
            if event::poll(std::time::Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key_event(key).await? {
                        break; // User quit
                    }
                }
            }

            // Small yield to allow other async tasks to run
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        Ok(())
    }

    /// The render state for this frame. An action failure in the shared error
    /// slot replaces the whole content area, like the page it mirrors.
    fn current_view(&self) -> ViewState {
        if let Some(message) = &self.error {
            return ViewState::Error {
                message: message.clone(),
            };
        }
        ViewState::resolve(self.pending_fetch.is_some(), &self.outcome)
    }

    /// Start a report fetch on a background task. Each fetch carries a
    /// generation number; only the result of the most recent one is applied,
    /// so a slow stale response can never overwrite a newer view.
    fn start_fetch(&mut self) {
        self.error = None;
        self.fetch_gen += 1;
        let generation = self.fetch_gen;

        let service = Arc::clone(&self.service);
        let assignment_id = self.assignment_id.clone();
        let user_id = self.user_id.clone();
        let loader = self.loader.clone();

        let handle = tokio::spawn(async move {
            let _busy = loader.acquire();
            report::fetch_report(&*service, &assignment_id, &user_id).await
        });

        self.pending_fetch = Some(PendingFetch { generation, handle });
        self.log.push("Fetching assignment report...");
    }

    async fn poll_fetch(&mut self) {
        let finished = matches!(&self.pending_fetch, Some(p) if p.handle.is_finished());
        if !finished {
            return;
        }

        let Some(pending) = self.pending_fetch.take() else {
            return;
        };
        let outcome = match pending.handle.await {
            Ok(outcome) => outcome,
            Err(e) => FetchOutcome::TransportError(format!("Fetch task failed: {}", e)),
        };

        if pending.generation != self.fetch_gen {
            // Superseded by a newer fetch; drop the stale result.
            return;
        }

        self.log.push(match &outcome {
            FetchOutcome::Found(_) => "Report loaded",
            FetchOutcome::NotFound => "No report for this assignment yet",
            FetchOutcome::TransportError(_) => "Failed to load report",
            FetchOutcome::Pending => "Still loading",
        });
        self.outcome = outcome;
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        // The dialog captures all typing while it is open
        if self.controller.dialog.is_some() {
            self.handle_dialog_key(key).await;
            return Ok(false);
        }

        if self.submissions.is_some() {
            return Ok(self.handle_submissions_key(key));
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true), // Quit
            KeyCode::Char('r') => self.start_fetch(),
            KeyCode::Enter | KeyCode::Esc => {
                // Reload from the error / not-found panels
                if matches!(
                    self.current_view(),
                    ViewState::Error { .. } | ViewState::NotFound
                ) {
                    self.start_fetch();
                }
            }
            KeyCode::Char('a') => {
                if self.is_unsubmitted() && self.controller.open_dialog() {
                    self.log.push("Opened submission dialog");
                }
            }
            KeyCode::Char('u') => {
                if self.is_submitted() {
                    let outcome = self
                        .controller
                        .unsubmit(&*self.service, &self.assignment_id, &self.loader)
                        .await;
                    self.apply_action_outcome(outcome, "Submission withdrawn");
                }
            }
            KeyCode::Char('s') => {
                if self.role.capabilities().can_view_submissions {
                    self.open_submissions().await;
                }
            }
            _ => {}
        }

        Ok(false)
    }

    async fn handle_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.controller.close_dialog(),
            KeyCode::Enter => {
                let outcome = self
                    .controller
                    .submit(&*self.service, &self.assignment_id, &self.loader)
                    .await;
                self.apply_action_outcome(outcome, "Submission sent");
            }
            KeyCode::Char(c) => {
                if let Some(dialog) = self.controller.dialog.as_mut() {
                    dialog.push_char(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(dialog) = self.controller.dialog.as_mut() {
                    dialog.backspace();
                }
            }
            _ => {}
        }
    }

    fn handle_submissions_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                self.submissions = None;
                self.start_fetch();
            }
            KeyCode::Up => {
                if let Some(pane) = self.submissions.as_mut() {
                    pane.select_prev();
                }
            }
            KeyCode::Down => {
                if let Some(pane) = self.submissions.as_mut() {
                    pane.select_next();
                }
            }
            KeyCode::Char('e') => self.export_submissions(),
            _ => {}
        }
        false
    }

    async fn open_submissions(&mut self) {
        let result = {
            let _busy = self.loader.acquire();
            self.service.list_submissions(&self.assignment_id).await
        };

        match result {
            Ok(entries) => {
                self.log.push(format!("Loaded {} submission(s)", entries.len()));
                self.submissions = Some(SubmissionsPane::new(entries));
            }
            Err(e) => {
                self.error = Some(format!("Failed to load submissions: {}", e));
            }
        }
    }

    fn export_submissions(&mut self) {
        let Some(pane) = self.submissions.as_mut() else {
            return;
        };

        let label = match &self.class_id {
            Some(class_id) => format!("{}_{}", class_id, self.assignment_id),
            None => self.assignment_id.clone(),
        };
        let total_marks = match &self.outcome {
            FetchOutcome::Found(report) => report.total_marks,
            _ => 0.0,
        };

        match export::export_submissions_to_csv(pane.rows.values(), &label, total_marks) {
            Ok(path) => {
                let path = path.to_string_lossy().to_string();
                self.log.push(format!("Exported to {}", path));
                pane.exported_to = Some(path);
            }
            Err(e) => {
                self.submissions = None;
                self.error = Some(format!("Failed to export submissions: {}", e));
            }
        }
    }

    fn apply_action_outcome(&mut self, outcome: ActionOutcome, success_note: &str) {
        match outcome {
            ActionOutcome::Refresh => {
                self.log.push(success_note);
                self.start_fetch();
            }
            ActionOutcome::Failed(message) => {
                self.log.push(message.clone());
                self.error = Some(message);
            }
            ActionOutcome::Ignored => {}
        }
    }

    fn is_unsubmitted(&self) -> bool {
        matches!(
            self.current_view(),
            ViewState::Loaded {
                submission: crate::ui::state::SubmissionView::Unsubmitted,
                ..
            }
        )
    }

    fn is_submitted(&self) -> bool {
        matches!(
            self.current_view(),
            ViewState::Loaded { submission, .. }
                if submission != crate::ui::state::SubmissionView::Unsubmitted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_report, FakeService};

    fn test_app(service: FakeService) -> App<FakeService> {
        App::new(
            service,
            Role::Student,
            "a1".to_string(),
            "u1".to_string(),
            None,
        )
    }

    async fn drain_fetch(app: &mut App<FakeService>) {
        for _ in 0..100 {
            app.poll_fetch().await;
            if app.pending_fetch.is_none() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        panic!("fetch never finished");
    }

    #[tokio::test]
    async fn test_fetch_result_is_applied_when_current() {
        let mut app = test_app(FakeService::with_report(Some(sample_report())));
        app.start_fetch();
        drain_fetch(&mut app).await;
        assert!(matches!(app.outcome, FetchOutcome::Found(_)));
        assert!(matches!(app.current_view(), ViewState::Loaded { .. }));
    }

    #[tokio::test]
    async fn test_stale_fetch_result_is_dropped() {
        let mut app = test_app(FakeService::with_report(Some(sample_report())));
        app.start_fetch();
        // A newer fetch was issued while this one was in flight.
        app.fetch_gen += 1;
        drain_fetch(&mut app).await;
        assert!(matches!(app.outcome, FetchOutcome::Pending));
    }

    #[tokio::test]
    async fn test_view_is_loading_while_fetch_is_in_flight() {
        let mut app = test_app(FakeService::with_report(None));
        app.start_fetch();
        assert!(matches!(app.current_view(), ViewState::Loading));
        drain_fetch(&mut app).await;
        assert!(matches!(app.current_view(), ViewState::NotFound));
    }

    #[tokio::test]
    async fn test_action_error_replaces_the_content_area() {
        let mut app = test_app(FakeService::with_report(Some(sample_report())));
        app.start_fetch();
        drain_fetch(&mut app).await;
        app.apply_action_outcome(
            ActionOutcome::Failed("Failed to submit assignment: boom".to_string()),
            "unused",
        );
        match app.current_view() {
            ViewState::Error { message } => assert!(message.contains("boom")),
            other => panic!("expected Error, got {:?}", other),
        }
        // Reloading clears the slot.
        app.start_fetch();
        drain_fetch(&mut app).await;
        assert!(matches!(app.current_view(), ViewState::Loaded { .. }));
    }
}
