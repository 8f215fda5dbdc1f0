//! Ingredient identification from a photo.

use crate::ai::interpret::interpret_ingredients;
use crate::ai::prompts::identify_ingredients::{
    render_identify_prompt, IDENTIFY_INGREDIENTS_PROMPT_NAME,
};
use crate::ai::{AiClient, ChatMessage, ChatRequest, ImageData, ModelTier, ResponseFormat};
use crate::error::IdentifyError;

/// Ask the model which ingredients appear in `image`.
///
/// Returns the model's comma-separated list as free text, trimmed.
pub async fn identify_ingredients(
    ai_client: &dyn AiClient,
    image: &ImageData,
) -> Result<String, IdentifyError> {
    let request = ChatRequest {
        messages: vec![ChatMessage::user_with_images(
            render_identify_prompt(),
            vec![image.clone()],
        )],
        tier: ModelTier::Fast,
        response_format: ResponseFormat::PlainText,
        max_tokens: None,
        temperature: Some(0.2),
    };

    let response = ai_client
        .complete(IDENTIFY_INGREDIENTS_PROMPT_NAME, request)
        .await?;

    interpret_ingredients(&response.content).ok_or(IdentifyError::Empty)
}
