pub mod auth;
pub mod completion;
pub mod error;
pub mod middleware;
pub mod suggestions;
pub mod tasks;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// All HTTP routes. Everything under `/api` sits behind the auth gate; the
/// gate only runs for matched routes, so a wrong method still yields 405.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    let protected_routes = Router::new()
        .route("/api/getTasks", get(tasks::list_tasks))
        .route("/api/saveTask", post(tasks::create_task))
        .route("/api/updateTask", put(tasks::update_task))
        .route("/api/deleteTask", delete(tasks::delete_task))
        .route("/api/suggestions", post(suggestions::suggest_tasks))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
