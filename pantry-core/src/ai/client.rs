//! The model boundary: a trait every backend implements.

use async_trait::async_trait;
use thiserror::Error;

use super::config::ConfigError;
use super::types::{ChatRequest, ChatResponse};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API request failed: {0}")]
    Request(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The model stopped early. Any text produced so far is kept.
    #[error("Model response incomplete: {reason}")]
    Incomplete {
        reason: String,
        partial_text: Option<String>,
    },

    #[error("Response not in cache and offline mode is enabled")]
    OfflineNotCached,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AiError {
    /// Raw model text attached to the failure, if the backend kept any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            AiError::Incomplete {
                partial_text: Some(text),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

/// Trait for AI clients.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Complete a chat request.
    ///
    /// The `prompt_name` is used for logging and cache organization.
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError>;
}

#[async_trait]
impl<T: AiClient + ?Sized> AiClient for Box<T> {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        (**self).complete(prompt_name, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_text_only_from_incomplete() {
        let err = AiError::Incomplete {
            reason: "MAX_TOKENS".to_string(),
            partial_text: Some("[{".to_string()),
        };
        assert_eq!(err.raw_text(), Some("[{"));

        let err = AiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.raw_text(), None);
    }
}
