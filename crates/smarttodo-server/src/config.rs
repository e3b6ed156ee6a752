use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "super-secret-jwt-token-with-at-least-32-characters-long",
];

const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1";
const DEFAULT_COMPLETIONS_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    /// Required `aud` claim; `None` disables the audience check.
    pub jwt_audience: Option<String>,
    pub completions: Option<CompletionsConfig>,
}

#[derive(Debug, Clone)]
pub struct CompletionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("SMARTTODO_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!(
                "SMARTTODO_JWT_SECRET is unset or still a placeholder; \
                 set it to the identity provider's JWT secret"
            );
        }

        let host = lookup("SMARTTODO_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("SMARTTODO_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("SMARTTODO_PORT must be a port number")?;
        let db_path: PathBuf = lookup("SMARTTODO_DB_PATH")
            .unwrap_or_else(|| "smarttodo.db".into())
            .into();

        let jwt_audience = match lookup("SMARTTODO_JWT_AUDIENCE") {
            Some(aud) if aud.trim().is_empty() => None,
            Some(aud) => Some(aud),
            None => Some("authenticated".into()),
        };

        let completions = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| CompletionsConfig {
                base_url: lookup("SMARTTODO_COMPLETIONS_URL")
                    .unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.into()),
                api_key,
                model: lookup("SMARTTODO_COMPLETIONS_MODEL")
                    .unwrap_or_else(|| DEFAULT_COMPLETIONS_MODEL.into()),
            });

        Ok(Self {
            host,
            port,
            db_path,
            jwt_secret,
            jwt_audience,
            completions,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
