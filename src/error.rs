use thiserror::Error;

/// Main error type for the movie duel engine
///
/// Game-rule violations (out of turn, unrecognized title, ...) are not errors:
/// they are reported through [`crate::core::TurnOutcome`].
#[derive(Error, Debug)]
pub enum EngineError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// Unknown game session id
    #[error("Game not found: {0}")]
    GameNotFound(String),

    /// Cache errors
    #[error("Cache error: {0}")]
    Cache(String),
}

impl EngineError {
    /// Shorthand for a provider failure
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True for failures caused by the upstream metadata provider
    pub fn is_upstream(&self) -> bool {
        matches!(self, EngineError::Provider { .. } | EngineError::HttpRequest(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, EngineError>;
