//! Fake AI client for testing.
//!
//! Returns deterministic responses based on prompt matching, so tests and
//! offline demos run without network access or API costs.

use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse};

#[derive(Debug, Clone)]
enum FakeReply {
    Text(String),
    /// Fails with [`AiError::Incomplete`] carrying this partial text.
    Incomplete(String),
    Fail(String),
}

/// A call seen by the fake, for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt_name: String,
    pub request: ChatRequest,
}

impl RecordedCall {
    /// All message text of the request, joined by newlines.
    pub fn prompt_text(&self) -> String {
        self.request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A fake AI client.
///
/// Replies are matched by checking whether the prompt contains a registered
/// substring (case-insensitive), in registration order. If nothing matches,
/// the default response is returned, or an error when there is none.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    replies: RwLock<Vec<(String, FakeReply)>>,
    default_response: Option<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeAiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    pub fn add_response(&self, prompt_contains: &str, response: &str) {
        self.push(prompt_contains, FakeReply::Text(response.to_string()));
    }

    /// Fail matching prompts with an incomplete response carrying `partial_text`.
    pub fn add_incomplete(&self, prompt_contains: &str, partial_text: &str) {
        self.push(prompt_contains, FakeReply::Incomplete(partial_text.to_string()));
    }

    /// Fail matching prompts with an API error.
    pub fn add_failure(&self, prompt_contains: &str, message: &str) {
        self.push(prompt_contains, FakeReply::Fail(message.to_string()));
    }

    fn push(&self, prompt_contains: &str, reply: FakeReply) {
        self.replies
            .write()
            .unwrap()
            .push((prompt_contains.to_lowercase(), reply));
    }

    /// A client that can serve a whole session offline.
    pub fn with_sample_responses() -> Self {
        let client = Self::new();
        client.add_response(
            "identify the food ingredients",
            "tomatoes, garlic, basil, spaghetti, olive oil",
        );
        client.add_response("new and distinct recipes", SAMPLE_SUGGESTIONS);
        client.add_response("diverse recipes", SAMPLE_RECIPES);
        client
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let call = RecordedCall {
            prompt_name: prompt_name.to_string(),
            request,
        };
        let prompt_lower = call.prompt_text().to_lowercase();
        self.calls.lock().unwrap().push(call);

        let reply = self
            .replies
            .read()
            .unwrap()
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(FakeReply::Text(text)) => Ok(ChatResponse::text(text)),
            Some(FakeReply::Incomplete(text)) => Err(AiError::Incomplete {
                reason: "MAX_TOKENS".to_string(),
                partial_text: Some(text),
            }),
            Some(FakeReply::Fail(message)) => Err(AiError::Api {
                status: 503,
                message,
            }),
            None => match &self.default_response {
                Some(text) => Ok(ChatResponse::text(text.clone())),
                None => Err(AiError::Request(format!(
                    "FakeAiClient: No response configured for prompt (first 100 chars): {}",
                    prompt_lower.chars().take(100).collect::<String>()
                ))),
            },
        }
    }
}

const SAMPLE_RECIPES: &str = r#"[
  {
    "id": "sample-spaghetti-pomodoro",
    "recipeName": "Spaghetti Pomodoro",
    "description": "A bright tomato and basil pasta.",
    "ingredients": ["200g spaghetti", "4 ripe tomatoes", "2 cloves garlic", "Fresh basil", "2 tbsp olive oil"],
    "instructions": ["Boil the spaghetti.", "Saute garlic in olive oil.", "Add chopped tomatoes and simmer 10 minutes.", "Toss with pasta and basil."],
    "cookingTime": "25 minutes",
    "difficulty": "Easy",
    "servings": 2,
    "nutritionalInfo": {"calories": "520 kcal", "protein": "16g", "carbs": "82g", "fat": "15g"}
  },
  {
    "id": "sample-bruschetta",
    "recipeName": "Tomato Bruschetta",
    "description": "Toasted bread with garlicky tomatoes.",
    "ingredients": ["1 baguette", "3 tomatoes", "1 clove garlic", "Basil leaves", "Olive oil"],
    "instructions": ["Toast sliced bread.", "Rub with garlic.", "Top with diced tomatoes, basil and oil."],
    "cookingTime": "15 minutes",
    "difficulty": "Easy",
    "servings": 4,
    "nutritionalInfo": {"calories": "210 kcal", "protein": "6g", "carbs": "30g", "fat": "7g"}
  },
  {
    "id": "sample-roasted-tomato-soup",
    "recipeName": "Roasted Tomato Soup",
    "description": "Slow-roasted tomatoes blended into a velvety soup.",
    "ingredients": ["8 tomatoes", "1 head garlic", "Basil", "3 tbsp olive oil", "500ml stock"],
    "instructions": ["Roast tomatoes and garlic for 40 minutes.", "Blend with stock.", "Simmer and finish with basil."],
    "cookingTime": "1 hour",
    "difficulty": "Medium",
    "servings": 4,
    "nutritionalInfo": {"calories": "180 kcal", "protein": "4g", "carbs": "18g", "fat": "11g"}
  }
]"#;

const SAMPLE_SUGGESTIONS: &str = r#"```json
[
  {
    "id": "sample-bruschetta",
    "recipeName": "Tomato Bruschetta",
    "description": "Toasted bread with garlicky tomatoes.",
    "ingredients": ["1 baguette", "3 tomatoes", "1 clove garlic", "Basil leaves", "Olive oil"],
    "instructions": ["Toast sliced bread.", "Rub with garlic.", "Top with diced tomatoes, basil and oil."],
    "cookingTime": "15 minutes",
    "difficulty": "Easy",
    "servings": 4,
    "nutritionalInfo": {"calories": "210 kcal", "protein": "6g", "carbs": "30g", "fat": "7g"}
  },
  {
    "id": "sample-garlic-confit-pasta",
    "recipeName": "Garlic Confit Pasta",
    "description": "Sweet, mellow garlic slowly poached in oil and tossed with spaghetti.",
    "ingredients": ["200g spaghetti", "1 head garlic", "120ml olive oil", "Basil", "Chili flakes"],
    "instructions": ["Poach peeled garlic in oil on low heat for 30 minutes.", "Cook spaghetti.", "Mash some garlic into the oil and toss with pasta."],
    "cookingTime": "40 minutes",
    "difficulty": "Medium",
    "servings": 2,
    "nutritionalInfo": {"calories": "640 kcal", "protein": "14g", "carbs": "78g", "fat": "30g"}
  }
]
```"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::types::ChatMessage;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(text)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fake_client_matching() {
        let client = FakeAiClient::with_response("HELLO", "world");
        let result = client.complete("greet", request("say hello there")).await.unwrap();
        assert_eq!(result.content, "world");
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.calls()[0].prompt_name, "greet");
    }

    #[tokio::test]
    async fn test_fake_client_no_match() {
        let client = FakeAiClient::new();
        assert!(client.complete("x", request("random")).await.is_err());
    }

    #[tokio::test]
    async fn test_fake_client_default_response() {
        let client = FakeAiClient::new().with_default_response("default");
        let result = client.complete("x", request("random")).await.unwrap();
        assert_eq!(result.content, "default");
    }

    #[tokio::test]
    async fn test_fake_client_incomplete_carries_text() {
        let client = FakeAiClient::new();
        client.add_incomplete("recipes", "[]");
        let err = client.complete("x", request("recipes")).await.unwrap_err();
        assert_eq!(err.raw_text(), Some("[]"));
    }

    #[tokio::test]
    async fn test_first_registered_match_wins() {
        let client = FakeAiClient::new();
        client.add_response("tomato", "first");
        client.add_response("tomato soup", "second");
        let result = client.complete("x", request("tomato soup")).await.unwrap();
        assert_eq!(result.content, "first");
    }
}
