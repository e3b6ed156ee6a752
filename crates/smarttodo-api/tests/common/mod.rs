#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use smarttodo_api::auth::{AppState, AppStateInner, TokenVerifier};
use smarttodo_api::completion::{CompletionService, SuggestError};
use smarttodo_api::router;
use smarttodo_api::suggestions::SuggestionBridge;
use smarttodo_db::Database;

pub const SECRET: &str = "integration-test-secret";
pub const AUDIENCE: &str = "authenticated";

/// Completion service that replays a canned answer and records prompts.
pub struct FakeCompletions {
    reply: Result<String, u16>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeCompletions {
    pub fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(content.to_owned()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionService for FakeCompletions {
    async fn complete(&self, prompt: &str) -> Result<String, SuggestError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        match &self.reply {
            Ok(content) => Ok(content.clone()),
            Err(status) => Err(SuggestError::Status {
                status: *status,
                body: "upstream exploded".into(),
            }),
        }
    }
}

pub fn state_with(completions: Option<Arc<dyn CompletionService>>) -> AppState {
    Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        verifier: TokenVerifier::new(SECRET, Some(AUDIENCE)),
        suggestions: completions.map(SuggestionBridge::new),
    })
}

pub fn app() -> Router {
    router(state_with(None))
}

pub fn token_for(user: Uuid) -> String {
    let exp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 3600;
    encode(
        &Header::default(),
        &json!({ "sub": user, "exp": exp, "aud": AUDIENCE, "role": "authenticated" }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// Fire one request at the router and decode the JSON response (`Null` when
/// the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
