use smarttodo_types::Task;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Login,
    Home,
}

/// Everything the UI renders. Fields change only through the transition
/// methods below, so every state the view can observe is one of theirs.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    page: Page,
    user: Option<Uuid>,
    tasks: Vec<Task>,
    draft: String,
    busy: bool,
    suggestions: Vec<String>,
    /// Checked suggestions, in the order they were checked.
    selected: Vec<String>,
    error: Option<String>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Reads --

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn user(&self) -> Option<Uuid> {
        self.user
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, suggestion: &str) -> bool {
        self.selected.iter().any(|s| s == suggestion)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // -- Session --

    /// Enter the home page as `user`. Signing in as someone else discards the
    /// previous user's data.
    pub fn signed_in(&mut self, user: Uuid) {
        if self.user != Some(user) {
            *self = Self::default();
            self.user = Some(user);
        }
        self.page = Page::Home;
    }

    pub fn signed_out(&mut self) {
        *self = Self::default();
    }

    // -- Tasks --

    pub fn tasks_loaded(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// A new task goes to the top, matching the server's newest-first order.
    pub fn task_saved(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn completion_patched(&mut self, id: i64, completed: bool) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = completed;
        }
    }

    pub fn task_removed(&mut self, id: i64) {
        self.tasks.retain(|t| t.id != id);
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    // -- Requests --

    /// Mark a request as outstanding. Returns `false`, changing nothing, if
    /// one already is.
    pub fn begin_request(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.error = None;
        true
    }

    pub fn end_request(&mut self) {
        self.busy = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -- Suggestions --

    /// Replace the suggestion list; any selection is reset with it.
    pub fn suggestions_loaded(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
        self.selected.clear();
    }

    /// Check or uncheck a suggestion. Unknown suggestions are ignored.
    pub fn toggle_suggestion(&mut self, suggestion: &str, checked: bool) {
        if !self.suggestions.iter().any(|s| s == suggestion) {
            return;
        }
        if checked {
            if !self.is_selected(suggestion) {
                self.selected.push(suggestion.to_owned());
            }
        } else {
            self.selected.retain(|s| s != suggestion);
        }
    }

    /// A suggestion has been saved as a task; it leaves both lists.
    pub fn suggestion_persisted(&mut self, suggestion: &str) {
        self.suggestions.retain(|s| s != suggestion);
        self.selected.retain(|s| s != suggestion);
    }

    pub fn suggestions_cleared(&mut self) {
        self.suggestions.clear();
        self.selected.clear();
    }
}
