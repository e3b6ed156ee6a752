mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use smarttodo_api::auth::{AppState, AppStateInner, TokenVerifier};
use smarttodo_api::completion::OpenAiCompletions;
use smarttodo_api::suggestions::SuggestionBridge;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "smarttodo=debug,smarttodo_api=debug,smarttodo_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = smarttodo_db::Database::open(&config.db_path)?;

    let suggestions = match &config.completions {
        Some(c) => {
            info!("AI suggestions enabled (model {} at {})", c.model, c.base_url);
            Some(SuggestionBridge::new(Arc::new(OpenAiCompletions::new(
                c.base_url.clone(),
                c.api_key.clone(),
                c.model.clone(),
            ))))
        }
        None => {
            info!("OPENAI_API_KEY not set; AI suggestions disabled");
            None
        }
    };

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        verifier: TokenVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref()),
        suggestions,
    });

    let app = smarttodo_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr()?;
    info!("SmartTodo server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    info!("Received Ctrl+C, shutting down...");
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
