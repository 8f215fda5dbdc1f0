//! Recipe generation and personalized suggestions.

use crate::ai::interpret::interpret_completion;
use crate::ai::prompts::{
    recipe_array_schema, render_generate_prompt, render_suggest_prompt,
    GENERATE_RECIPES_PROMPT_NAME, SUGGEST_RECIPES_PROMPT_NAME,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, ModelTier, ResponseFormat};
use crate::error::GenerationError;
use crate::filters::GenerationRequest;
use crate::types::Recipe;

fn recipe_request(prompt: String) -> ChatRequest {
    ChatRequest {
        messages: vec![ChatMessage::user(prompt)],
        tier: ModelTier::Pro,
        response_format: ResponseFormat::Json(recipe_array_schema()),
        max_tokens: None,
        temperature: None,
    }
}

/// Generate recipes for the request's ingredients and filters.
pub async fn generate_recipes(
    ai_client: &dyn AiClient,
    request: &GenerationRequest,
) -> Result<Vec<Recipe>, GenerationError> {
    let prompt = render_generate_prompt(request);
    let outcome = ai_client
        .complete(GENERATE_RECIPES_PROMPT_NAME, recipe_request(prompt))
        .await;

    interpret_completion(outcome).inspect_err(|e| {
        tracing::error!(error = %e, "Error generating recipes");
    })
}

/// Generate new recipes in the spirit of `liked`.
///
/// The model is asked for distinct recipes, but may still repeat ids the
/// caller already has.
pub async fn suggest_recipes(
    ai_client: &dyn AiClient,
    liked: &[Recipe],
    request: &GenerationRequest,
) -> Result<Vec<Recipe>, GenerationError> {
    let prompt = render_suggest_prompt(liked, request);
    let outcome = ai_client
        .complete(SUGGEST_RECIPES_PROMPT_NAME, recipe_request(prompt))
        .await;

    interpret_completion(outcome).inspect_err(|e| {
        tracing::error!(error = %e, "Error generating suggested recipes");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeAiClient;
    use crate::filters::Filters;

    const RECIPES: &str = r#"[{
        "id": "a", "recipeName": "Fried Rice", "description": "Quick",
        "ingredients": ["rice"], "instructions": ["Fry"], "cookingTime": "15 min",
        "difficulty": "Easy", "servings": 2,
        "nutritionalInfo": {"calories": "400", "protein": "9g", "carbs": "60g", "fat": "12g"}
    }]"#;

    #[tokio::test]
    async fn test_generate_uses_schema_and_pro_model() {
        let client = FakeAiClient::with_response("diverse recipes", RECIPES);
        let request = GenerationRequest::new("rice, eggs", Filters::default());

        let recipes = generate_recipes(&client, &request).await.unwrap();
        assert_eq!(recipes.len(), 1);

        let call = &client.calls()[0];
        assert_eq!(call.prompt_name, GENERATE_RECIPES_PROMPT_NAME);
        assert_eq!(call.request.tier, ModelTier::Pro);
        assert!(matches!(call.request.response_format, ResponseFormat::Json(_)));
        assert!(call.prompt_text().contains("rice, eggs"));
    }

    #[tokio::test]
    async fn test_generate_failure() {
        let client = FakeAiClient::new();
        client.add_failure("diverse recipes", "overloaded");
        let request = GenerationRequest::new("rice", Filters::default());

        assert!(generate_recipes(&client, &request).await.is_err());
    }

    #[tokio::test]
    async fn test_suggest_recovers_fenced_output() {
        let client = FakeAiClient::with_response(
            "new and distinct",
            &format!("```json\n{}\n```", RECIPES),
        );
        let request = GenerationRequest::new("rice", Filters::default());
        let liked = generate_recipes(
            &FakeAiClient::with_response("diverse", RECIPES),
            &request,
        )
        .await
        .unwrap();

        let suggested = suggest_recipes(&client, &liked, &request).await.unwrap();
        assert_eq!(suggested[0].id, "a");
        assert_eq!(client.calls()[0].prompt_name, SUGGEST_RECIPES_PROMPT_NAME);
        assert!(client.calls()[0].prompt_text().contains("- Fried Rice: Quick"));
    }
}
