use tracing::{debug, info, warn};

use crate::api::{ClientError, TaskApi};
use crate::session::{Session, SessionEvent, Subscription};
use crate::state::ClientState;

/// Drives [`ClientState`] from user actions and session events, talking to
/// the server through a [`TaskApi`].
///
/// Every network action follows the same shape: refuse to start while another
/// request is outstanding, mark busy, call, patch the local list only on
/// success, record a short message on failure, and always clear busy.
pub struct TodoApp<A> {
    api: A,
    session: Option<Session>,
    state: ClientState,
}

impl<A: TaskApi> TodoApp<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: None,
            state: ClientState::new(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // -- Session --

    pub async fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn(session) | SessionEvent::TokenRefreshed(session) => {
                let previous = self.session.as_ref().map(|s| s.user_id);
                let user = session.user_id;
                self.session = Some(session);

                // A refresh for the current user only swaps the token.
                if previous != Some(user) {
                    info!("Signed in as {}", user);
                    self.state.signed_in(user);
                    self.refresh_tasks().await;
                }
            }
            SessionEvent::SignedOut => {
                info!("Signed out");
                self.session = None;
                self.state.signed_out();
            }
        }
    }

    /// Apply session events until the publisher goes away. The subscription
    /// is released when this returns.
    pub async fn follow_session(&mut self, mut subscription: Subscription) {
        while let Some(event) = subscription.next().await {
            self.handle_session_event(event).await;
        }
        debug!("Session event stream closed");
    }

    /// Local sign-out; the identity integration is expected to publish
    /// `SignedOut` as well, which is then a no-op.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.state.signed_out();
    }

    // -- Local edits --

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.state.set_draft(draft);
    }

    pub fn toggle_suggestion(&mut self, suggestion: &str, checked: bool) {
        self.state.toggle_suggestion(suggestion, checked);
    }

    pub fn clear_error(&mut self) {
        self.state.clear_error();
    }

    // -- Network actions --

    pub async fn refresh_tasks(&mut self) {
        let Some(token) = self.begin() else { return };

        match self.api.list_tasks(&token).await {
            Ok(tasks) => self.state.tasks_loaded(tasks),
            Err(e) => self.report("Error fetching tasks", e),
        }
        self.state.end_request();
    }

    /// Save the draft as a new task. An empty draft is ignored.
    pub async fn save_task(&mut self) {
        let description = self.state.draft().to_owned();
        if description.trim().is_empty() {
            return;
        }
        let Some(token) = self.begin() else { return };

        match self.api.create_task(&token, &description).await {
            Ok(task) => {
                self.state.task_saved(task);
                self.state.set_draft(String::new());
            }
            Err(e) => self.report("Error saving task", e),
        }
        self.state.end_request();
    }

    pub async fn set_completed(&mut self, id: i64, completed: bool) {
        let Some(token) = self.begin() else { return };

        match self.api.set_completed(&token, id, completed).await {
            Ok(Some(task)) => self.state.completion_patched(task.id, task.completed),
            Ok(None) => {
                // Gone on the server; stop showing it.
                debug!("Task {} no longer exists, dropping it locally", id);
                self.state.task_removed(id);
            }
            Err(e) => self.report("Error updating task", e),
        }
        self.state.end_request();
    }

    pub async fn delete_task(&mut self, id: i64) {
        let Some(token) = self.begin() else { return };

        match self.api.delete_task(&token, id).await {
            Ok(()) => self.state.task_removed(id),
            Err(e) => self.report("Error deleting task", e),
        }
        self.state.end_request();
    }

    /// Ask for suggestions based on the current task list. The previous
    /// suggestions and selection are discarded first.
    pub async fn request_suggestions(&mut self) {
        let Some(token) = self.begin() else { return };
        self.state.suggestions_cleared();

        let descriptions: Vec<String> = self
            .state
            .tasks()
            .iter()
            .map(|t| t.description.clone())
            .collect();

        match self.api.suggest(&token, &descriptions).await {
            Ok(suggestions) => self.state.suggestions_loaded(suggestions),
            Err(e) => self.report("Error getting AI suggestions", e),
        }
        self.state.end_request();
    }

    /// Save every checked suggestion as a task, one request at a time in the
    /// order they were checked.
    ///
    /// Stops at the first failure: suggestions already saved stay saved and
    /// leave the list, the rest stay listed and checked. With nothing left to
    /// save the suggestion list is cleared.
    pub async fn add_selected_suggestions(&mut self) {
        let Some(token) = self.begin() else { return };
        let selected = self.state.selected().to_vec();

        for description in selected {
            match self.api.create_task(&token, &description).await {
                Ok(task) => {
                    self.state.task_saved(task);
                    self.state.suggestion_persisted(&description);
                }
                Err(e) => {
                    self.report("Error saving task", e);
                    self.state.end_request();
                    return;
                }
            }
        }

        self.state.suggestions_cleared();
        self.state.end_request();
    }

    /// Start a request: the access token, or `None` if busy or signed out.
    fn begin(&mut self) -> Option<String> {
        if !self.state.begin_request() {
            debug!("Request ignored while another is in flight");
            return None;
        }
        let token = self.session.as_ref().map(|s| s.access_token.clone());
        if token.is_none() {
            self.report("Not signed in", ClientError::SignedOut);
            self.state.end_request();
        }
        token
    }

    fn report(&mut self, context: &str, err: ClientError) {
        warn!("{}: {}", context, err);
        self.state.fail(err.user_message(context));
    }
}
