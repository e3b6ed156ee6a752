use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// Claims carried by identity-provider access tokens. Shared by the server's
/// auth gate and by test helpers that mint tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

// -- Tasks --

/// Body of `POST /api/saveTask`. The field is optional on the wire so that a
/// missing description is reported as a validation error, not a decode error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT /api/updateTask`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Body of `DELETE /api/deleteTask`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub message: String,
}

// -- Suggestions --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SuggestionsRequest {
    /// Descriptions of the caller's current tasks.
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

// -- Errors --

/// Every non-2xx JSON response carries exactly this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
