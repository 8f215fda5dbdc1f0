//! Disk-based AI response cache.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::types::{ChatRequest, ChatResponse, Usage};

/// Disk-based AI response cache.
#[derive(Debug)]
pub struct AiCache {
    cache_dir: PathBuf,
}

/// A response as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAiResponse {
    pub content: String,
    pub usage: Usage,
    pub cached_at: DateTime<Utc>,
    pub model: String,
}

impl From<CachedAiResponse> for ChatResponse {
    fn from(cached: CachedAiResponse) -> Self {
        Self {
            content: cached.content,
            usage: cached.usage,
            cached: true,
        }
    }
}

/// Cache key components.
#[derive(Debug, Clone)]
pub struct CacheKey {
    pub prompt_name: String,
    pub model: String,
    pub input_hash: String,
}

impl CacheKey {
    /// Key a request by prompt, model and a hash of everything sent to the model.
    pub fn new(prompt_name: &str, model: &str, request: &ChatRequest) -> Self {
        let input_json = serde_json::to_string(request).unwrap_or_default();

        Self {
            prompt_name: prompt_name.to_string(),
            model: model.to_string(),
            input_hash: sha256_hex(&input_json),
        }
    }

    /// Path relative to the cache directory:
    /// `{prompt_name}/{model_safe}/{hash[0:2]}/{hash}.json`
    pub fn to_path(&self) -> PathBuf {
        let model_safe = self.model.replace(['/', ':'], "--");

        PathBuf::new()
            .join(&self.prompt_name)
            .join(model_safe)
            .join(&self.input_hash[..2])
            .join(format!("{}.json", self.input_hash))
    }
}

impl AiCache {
    /// Create a cache rooted at `cache_dir`.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Get a cached response, if present.
    pub fn get(&self, key: &CacheKey) -> Option<CachedAiResponse> {
        let path = self.cache_dir.join(key.to_path());
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Store a response in the cache.
    pub fn put(&self, key: &CacheKey, response: &ChatResponse, model: &str) -> std::io::Result<()> {
        let path = self.cache_dir.join(key.to_path());

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cached = CachedAiResponse {
            content: response.content.clone(),
            usage: response.usage.clone(),
            cached_at: Utc::now(),
            model: model.to_string(),
        };

        let json = serde_json::to_string_pretty(&cached)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(&path, json)
    }

    /// Count the cached responses on disk.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        count_json_files(&self.cache_dir, &mut stats.cached_responses);
        stats
    }

    /// Delete all cached responses.
    pub fn clear(&self) -> std::io::Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}

fn count_json_files(dir: &Path, count: &mut usize) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            count_json_files(&path, count);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            *count += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub cached_responses: usize,
}

fn sha256_hex(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::ChatMessage;
    use tempfile::TempDir;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(text)],
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_key_path() {
        let key = CacheKey::new("generate_recipes", "models/gemini-2.5-pro", &request("test"));

        let path = key.to_path();
        assert!(path.starts_with("generate_recipes/models--gemini-2.5-pro/"));
        assert!(path.to_string_lossy().ends_with(".json"));
    }

    #[test]
    fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let cache = AiCache::new(dir.path().to_path_buf());
        let key = CacheKey::new("identify_ingredients", "gemini-2.5-flash", &request("photo"));

        assert!(cache.get(&key).is_none());
        cache
            .put(&key, &ChatResponse::text("tomatoes, basil"), "gemini-2.5-flash")
            .unwrap();

        let hit: ChatResponse = cache.get(&key).unwrap().into();
        assert_eq!(hit.content, "tomatoes, basil");
        assert!(hit.cached);
        assert_eq!(cache.stats().cached_responses, 1);

        cache.clear().unwrap();
        assert_eq!(cache.stats().cached_responses, 0);
    }

    #[test]
    fn test_different_requests_different_keys() {
        let a = CacheKey::new("p", "m", &request("eggs"));
        let b = CacheKey::new("p", "m", &request("flour"));
        assert_ne!(a.input_hash, b.input_hash);
    }
}
