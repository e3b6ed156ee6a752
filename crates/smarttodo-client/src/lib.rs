//! Client side of SmartTodo: the view state a UI renders, the controller
//! that mutates it, and the HTTP client it talks through.
//!
//! Rendering is left to the embedding UI; it reads [`ClientState`] after each
//! action and forwards user input to [`TodoApp`].

pub mod api;
pub mod app;
pub mod session;
pub mod state;

pub use api::{ClientError, HttpTaskApi, TaskApi};
pub use app::TodoApp;
pub use session::{Session, SessionEvent, SessionEvents, Subscription};
pub use state::{ClientState, Page};
