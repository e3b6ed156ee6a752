use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use smarttodo_types::api::ErrorBody;

/// Every way a request can fail. The rendered body is always `{ "error": ... }`
/// and never contains the internal detail, which is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input the caller can fix.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed, expired or otherwise invalid bearer credential.
    #[error("Authentication failed")]
    Unauthorized,

    /// Store failures and anything else unexpected.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: anyhow::Error,
    },

    /// The completion service was unreachable or answered with an error.
    #[error("{message}")]
    Upstream {
        message: &'static str,
        detail: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: &'static str, detail: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message,
            detail: detail.into(),
        }
    }

    pub fn upstream(message: &'static str, detail: impl Into<anyhow::Error>) -> Self {
        Self::Upstream {
            message,
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } | Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(message) => debug!("Rejected request: {}", message),
            Self::Unauthorized => {}
            Self::Internal { message, detail } => error!("{}: {:#}", message, detail),
            Self::Upstream { message, detail } => error!("{} (upstream): {:#}", message, detail),
        }

        (self.status(), Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Unreadable JSON body: {}", rejection.body_text());
        Self::validation("Invalid request body")
    }
}
