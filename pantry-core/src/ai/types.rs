//! AI request and response types.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize, Serializer};

/// Role in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// An inline image attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageData {
    /// Detected content type, e.g. "image/jpeg".
    pub mime_type: String,
    #[serde(serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
}

impl ImageData {
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(data))
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageData>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            images: vec![],
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images: vec![],
        }
    }

    pub fn user_with_images(content: impl Into<String>, images: Vec<ImageData>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images,
        }
    }
}

/// Which model a request should go to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap multimodal model, used for ingredient identification.
    Fast,
    /// Stronger model, used for recipe generation.
    #[default]
    Pro,
}

/// Shape of the output the model is asked to produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    PlainText,
    /// JSON conforming to the given response schema.
    Json(serde_json::Value),
}

/// Request for a chat completion.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub tier: ModelTier,
    pub response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated content.
    pub content: String,
    /// Token usage statistics.
    pub usage: Usage,
    /// Whether this response came from cache.
    #[serde(default)]
    pub cached: bool,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: Usage::default(),
            cached: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_serializes_as_base64() {
        let image = ImageData {
            mime_type: "image/png".to_string(),
            data: vec![1, 2, 3],
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["data"], "AQID");
        assert_eq!(image.to_base64(), "AQID");
    }

    #[test]
    fn test_text_only_message_omits_images() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert!(!json.contains("images"));
    }
}
