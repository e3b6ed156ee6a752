use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, warn};

use smarttodo_types::api::{SuggestionsRequest, SuggestionsResponse};

use crate::auth::AppState;
use crate::completion::{CompletionService, SuggestError};
use crate::error::ApiError;
use crate::middleware::AuthUser;

const SUGGESTIONS_FAILED: &str = "Error getting AI suggestions";

/// Asks a completion service for new tasks based on the existing ones.
/// Never reads or writes the task store.
#[derive(Clone)]
pub struct SuggestionBridge {
    service: Arc<dyn CompletionService>,
}

impl SuggestionBridge {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self { service }
    }

    pub async fn suggest(&self, descriptions: &[String]) -> Result<Vec<String>, SuggestError> {
        let prompt = build_prompt(descriptions);
        let content = self.service.complete(&prompt).await?;
        Ok(parse_suggestions(&content))
    }
}

pub fn build_prompt(descriptions: &[String]) -> String {
    format!(
        "Based on the tasks: {}, suggest five new tasks I should add to my todo list \
         in JSON array format with property \"suggestions\".",
        descriptions.join(", ")
    )
}

/// Parse the model's reply. Anything unusable yields an empty list; a bad
/// reply is never an error.
///
/// Accepts `{"suggestions": [...]}` or a bare array, optionally wrapped in a
/// markdown code fence. Non-string and blank entries are dropped and
/// duplicates removed, keeping first-seen order.
pub fn parse_suggestions(content: &str) -> Vec<String> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        warn!("Completion reply was empty");
        return Vec::new();
    }

    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!("Completion reply is not JSON: {}", e);
            return Vec::new();
        }
    };

    let items = match &value {
        serde_json::Value::Array(items) => items,
        other => match other.get("suggestions").and_then(|s| s.as_array()) {
            Some(items) => items,
            None => {
                warn!("Completion reply has no \"suggestions\" array");
                return Vec::new();
            }
        },
    };

    let mut suggestions: Vec<String> = Vec::with_capacity(items.len());
    for text in items.iter().filter_map(|item| item.as_str()) {
        let text = text.trim();
        if !text.is_empty() && !suggestions.iter().any(|s| s == text) {
            suggestions.push(text.to_owned());
        }
    }
    suggestions
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// POST /api/suggestions: `{ tasks: [description, ...] }` → `{ suggestions }`.
pub async fn suggest_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<SuggestionsRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let Json(req) = body?;

    let bridge = state
        .suggestions
        .as_ref()
        .ok_or_else(|| ApiError::upstream(SUGGESTIONS_FAILED, SuggestError::NotConfigured))?;

    let suggestions = bridge
        .suggest(&req.tasks)
        .await
        .map_err(|e| ApiError::upstream(SUGGESTIONS_FAILED, e))?;

    info!(
        "Generated {} suggestions for {} from {} tasks",
        suggestions.len(),
        user.id,
        req.tasks.len()
    );
    Ok(Json(SuggestionsResponse { suggestions }))
}
