//! AI configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use super::types::ModelTier;

/// Default Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for recipe generation and suggestions.
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Default model for identifying ingredients in photos.
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";

/// Default rate limit between requests in milliseconds.
pub const DEFAULT_RATE_LIMIT_MS: u64 = 500;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// AI client configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key for Gemini.
    pub api_key: String,
    /// Model used for [`ModelTier::Pro`] requests.
    pub model: String,
    /// Model used for [`ModelTier::Fast`] requests.
    pub vision_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Directory for caching responses. `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// If true, only use cache, error if not cached.
    pub offline: bool,
    /// Milliseconds to wait between requests.
    pub rate_limit_ms: u64,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AiConfig {
    /// Build a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            offline: false,
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GEMINI_API_KEY`: API key for the Gemini API
    ///
    /// Optional:
    /// - `PANTRY_AI_MODEL`: Recipe model (default: "gemini-2.5-pro")
    /// - `PANTRY_AI_VISION_MODEL`: Photo model (default: "gemini-2.5-flash")
    /// - `PANTRY_AI_BASE_URL`: API base URL
    /// - `PANTRY_AI_CACHE_DIR`: Enables the response cache in this directory
    /// - `PANTRY_AI_OFFLINE`: Use cache only (default: false)
    /// - `PANTRY_AI_RATE_LIMIT_MS`: Rate limit in ms (default: 500)
    /// - `PANTRY_AI_TIMEOUT_SECS`: Request timeout in seconds (default: 120)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let mut config = Self::new(api_key);

        if let Ok(model) = env::var("PANTRY_AI_MODEL") {
            config.model = model;
        }
        if let Ok(model) = env::var("PANTRY_AI_VISION_MODEL") {
            config.vision_model = model;
        }
        if let Ok(base_url) = env::var("PANTRY_AI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        config.cache_dir = env::var("PANTRY_AI_CACHE_DIR")
            .ok()
            .map(|dir| expand_home(&dir));

        config.offline = env::var("PANTRY_AI_OFFLINE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if let Some(ms) = parse_env_u64("PANTRY_AI_RATE_LIMIT_MS")? {
            config.rate_limit_ms = ms;
        }
        if let Some(secs) = parse_env_u64("PANTRY_AI_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Model name for a tier.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.vision_model,
            ModelTier::Pro => &self.model,
        }
    }
}

fn parse_env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
