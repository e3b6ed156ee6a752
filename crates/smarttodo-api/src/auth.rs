use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use smarttodo_db::Database;
use smarttodo_types::api::Claims;

use crate::error::ApiError;
use crate::suggestions::SuggestionBridge;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub verifier: TokenVerifier,
    /// `None` when no completion service is configured.
    pub suggestions: Option<SuggestionBridge>,
}

/// Verifies access tokens issued by the identity provider (HS256, shared
/// secret). Nothing is cached between calls.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// `audience` of `None` skips the `aud` check entirely.
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Bearer token rejected: {}", e);
                ApiError::Unauthorized
            })
    }
}
