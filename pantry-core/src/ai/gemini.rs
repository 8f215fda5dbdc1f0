//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::cache::{AiCache, CacheKey};
use super::client::{AiClient, AiError};
use super::config::AiConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat, Role, Usage};

/// Gemini client with rate limiting and optional response caching.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    cache: Option<AiCache>,
    config: AiConfig,
    last_request: Mutex<Option<Instant>>,
}

impl GeminiClient {
    /// Create a new client from environment configuration.
    pub fn from_env() -> Result<Self, AiError> {
        let config = AiConfig::from_env()?;
        Self::new(config)
    }

    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Request(e.to_string()))?;
        let cache = config.cache_dir.clone().map(AiCache::new);

        Ok(Self {
            http,
            cache,
            config,
            last_request: Mutex::new(None),
        })
    }

    /// Apply rate limiting between requests.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            let min_interval = Duration::from_millis(self.config.rate_limit_ms);

            if elapsed < min_interval {
                tokio::time::sleep(min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let model = self.config.model_for(request.tier).to_string();
        let cache_key = CacheKey::new(prompt_name, &model, &request);

        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&cache_key)) {
            tracing::debug!(prompt_name = prompt_name, "AI response found in cache");
            return Ok(cached.into());
        }

        if self.config.offline {
            return Err(AiError::OfflineNotCached);
        }

        self.rate_limit().await;

        let body = build_request_body(&request);

        tracing::debug!(prompt_name = prompt_name, model = %model, "Calling Gemini API");

        let response = self
            .http
            .post(self.endpoint(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(AiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(AiError::Api { status, message });
        }

        let chat_response = parse_response_body(&text)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&cache_key, &chat_response, &model) {
                tracing::warn!("Failed to cache AI response: {}", e);
            }
        }

        Ok(chat_response)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn to_content(msg: &ChatMessage) -> Content {
    let mut parts = vec![Part {
        text: Some(msg.content.clone()),
        inline_data: None,
    }];
    parts.extend(msg.images.iter().map(|image| Part {
        text: None,
        inline_data: Some(InlineData {
            mime_type: image.mime_type.clone(),
            data: image.to_base64(),
        }),
    }));

    Content {
        role: Some("user".to_string()),
        parts,
    }
}

fn build_request_body(request: &ChatRequest) -> GenerateContentRequest {
    let system_parts: Vec<Part> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| Part {
            text: Some(m.content.clone()),
            inline_data: None,
        })
        .collect();

    let contents = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(to_content)
        .collect();

    let (response_mime_type, response_schema) = match &request.response_format {
        ResponseFormat::PlainText => ("text/plain", None),
        ResponseFormat::Json(schema) => ("application/json", Some(schema.clone())),
    };

    GenerateContentRequest {
        contents,
        system_instruction: (!system_parts.is_empty()).then_some(Content {
            role: None,
            parts: system_parts,
        }),
        generation_config: GenerationConfig {
            response_mime_type,
            response_schema,
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
    }
}

fn parse_response_body(body: &str) -> Result<ChatResponse, AiError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| AiError::ParseError(e.to_string()))?;

    let usage = response
        .usage_metadata
        .map(|u| Usage {
            prompt_tokens: u.prompt_token_count.unwrap_or(0),
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        })
        .unwrap_or_default();

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "NO_CANDIDATES".to_string());
        return Err(AiError::Incomplete {
            reason,
            partial_text: None,
        });
    };

    let content: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    match candidate.finish_reason.as_deref() {
        None | Some("STOP") => Ok(ChatResponse {
            content,
            usage,
            cached: false,
        }),
        Some(reason) => Err(AiError::Incomplete {
            reason: reason.to_string(),
            partial_text: (!content.is_empty()).then_some(content),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::{ImageData, ModelTier};

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            messages: vec![
                ChatMessage::system("be brief"),
                ChatMessage::user_with_images(
                    "what is this?",
                    vec![ImageData {
                        mime_type: "image/png".to_string(),
                        data: vec![1, 2, 3],
                    }],
                ),
            ],
            tier: ModelTier::Fast,
            response_format: ResponseFormat::PlainText,
            max_tokens: Some(128),
            temperature: None,
        };

        let json = serde_json::to_value(build_request_body(&request)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["contents"][0]["parts"][1]["inlineData"]["data"], "AQID");
        assert_eq!(json["generationConfig"]["responseMimeType"], "text/plain");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 128);
        assert!(json["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_json_request_includes_schema() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("recipes please")],
            response_format: ResponseFormat::Json(serde_json::json!({"type": "ARRAY"})),
            ..Default::default()
        };

        let json = serde_json::to_value(build_request_body(&request)).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        }"#;

        let response = parse_response_body(body).unwrap();
        assert_eq!(response.content, r#"[{"a":1}]"#);
        assert_eq!(response.usage.total_tokens, 15);
        assert!(!response.cached);
    }

    #[test]
    fn test_truncated_response_keeps_partial_text() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "```json\n[]\n```"}]},
                "finishReason": "MAX_TOKENS"
            }]
        }"#;

        let err = parse_response_body(body).unwrap_err();
        assert!(matches!(err, AiError::Incomplete { ref reason, .. } if reason == "MAX_TOKENS"));
        assert_eq!(err.raw_text(), Some("```json\n[]\n```"));
    }

    #[test]
    fn test_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_response_body(body).unwrap_err();
        assert!(matches!(err, AiError::Incomplete { ref reason, partial_text: None } if reason == "SAFETY"));
    }

    #[tokio::test]
    async fn test_offline_without_cache_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AiConfig::new("key");
        config.cache_dir = Some(dir.path().to_path_buf());
        config.offline = true;

        let client = GeminiClient::new(config).unwrap();
        let result = client
            .complete("test", ChatRequest {
                messages: vec![ChatMessage::user("hello")],
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(AiError::OfflineNotCached)));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = AiConfig::new("key");
        config.cache_dir = Some(dir.path().to_path_buf());
        config.offline = true;

        let request = ChatRequest {
            messages: vec![ChatMessage::user("hello")],
            ..Default::default()
        };
        let key = CacheKey::new("test", config.model_for(request.tier), &request);
        AiCache::new(dir.path().to_path_buf())
            .put(&key, &ChatResponse::text("cached answer"), &config.model)
            .unwrap();

        let client = GeminiClient::new(config).unwrap();
        let response = client.complete("test", request).await.unwrap();
        assert_eq!(response.content, "cached answer");
        assert!(response.cached);
    }
}
