//! AI client module for the Gemini API.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI backends
//! - `GeminiClient` implementation with rate limiting and optional disk caching
//! - `FakeAiClient` for tests and offline runs
//! - Prompt templates, the recipe response schema, and response interpretation
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `PANTRY_AI_PROVIDER` (optional): "gemini" (default) or "fake"
//! - `GEMINI_API_KEY` (required for gemini): Your Gemini API key
//! - `PANTRY_AI_MODEL` / `PANTRY_AI_VISION_MODEL` (optional): Model names
//! - `PANTRY_AI_BASE_URL` (optional): API base URL
//! - `PANTRY_AI_CACHE_DIR` (optional): Enables the response cache
//! - `PANTRY_AI_OFFLINE` (optional): Set to "true" to use cache only
//! - `PANTRY_AI_RATE_LIMIT_MS` (optional): Delay between requests in ms
//! - `PANTRY_AI_TIMEOUT_SECS` (optional): Request timeout in seconds
//!
//! # Example
//!
//! ```ignore
//! use pantry_core::ai::{generate_recipes, GeminiClient};
//! use pantry_core::{Filters, GenerationRequest};
//!
//! let client = GeminiClient::from_env()?;
//! let request = GenerationRequest::new("eggs, spinach, feta", Filters::default());
//! let recipes = generate_recipes(&client, &request).await?;
//! ```

mod cache;
mod client;
mod config;
mod fake;
mod gemini;
mod generate;
mod identify;
pub mod interpret;
pub mod prompts;
mod types;

pub use cache::{AiCache, CacheKey, CacheStats, CachedAiResponse};
pub use client::{AiClient, AiError};
pub use config::{expand_home, AiConfig, ConfigError};
pub use fake::{FakeAiClient, RecordedCall};
pub use gemini::GeminiClient;
pub use generate::{generate_recipes, suggest_recipes};
pub use identify::identify_ingredients;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ImageData, ModelTier, ResponseFormat, Role, Usage,
};

/// Build the client selected by `PANTRY_AI_PROVIDER`.
pub fn create_client_from_env() -> Result<Box<dyn AiClient>, AiError> {
    let provider = std::env::var("PANTRY_AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());

    match provider.as_str() {
        "gemini" => Ok(Box::new(GeminiClient::from_env()?)),
        "fake" => Ok(Box::new(FakeAiClient::with_sample_responses())),
        other => Err(AiError::Config(ConfigError::InvalidValue {
            name: "PANTRY_AI_PROVIDER".to_string(),
            value: other.to_string(),
        })),
    }
}
