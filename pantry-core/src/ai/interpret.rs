//! Turning model output into recipes.
//!
//! A response is parsed strictly first. When that fails, or when the model call
//! itself failed but kept some raw text, code fences are stripped from the text
//! and the strict parse is retried once. Either the whole array parses and
//! validates, or the call fails.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::client::AiError;
use super::types::ChatResponse;
use crate::error::{GenerationError, InterpretError};
use crate::types::Recipe;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid regex"));

/// Strictly parse a JSON recipe array and validate it.
pub fn parse_recipes(raw: &str) -> Result<Vec<Recipe>, InterpretError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InterpretError::EmptyPayload);
    }

    let recipes: Vec<Recipe> = serde_json::from_str(trimmed)?;
    validate(&recipes)?;
    Ok(recipes)
}

fn validate(recipes: &[Recipe]) -> Result<(), InterpretError> {
    let mut seen = HashSet::with_capacity(recipes.len());
    for recipe in recipes {
        if recipe.id.trim().is_empty() {
            return Err(InterpretError::EmptyId);
        }
        if recipe.servings == 0 {
            return Err(InterpretError::InvalidServings {
                id: recipe.id.clone(),
            });
        }
        if !seen.insert(recipe.id.as_str()) {
            return Err(InterpretError::DuplicateId(recipe.id.clone()));
        }
    }
    Ok(())
}

/// Remove Markdown code fence markers, with or without a `json` tag.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Interpret the outcome of a recipe completion call.
pub fn interpret_completion(
    outcome: Result<ChatResponse, AiError>,
) -> Result<Vec<Recipe>, GenerationError> {
    match outcome {
        Ok(response) => match parse_recipes(&response.content) {
            Ok(recipes) => Ok(recipes),
            Err(first) => {
                tracing::warn!(error = %first, "Strict recipe parse failed, retrying without code fences");
                parse_fallback(&response.content).map_err(|_| GenerationError::from(first))
            }
        },
        Err(err) => {
            let Some(raw) = err.raw_text() else {
                return Err(err.into());
            };
            tracing::warn!(error = %err, "Model call failed, trying to recover recipes from partial text");
            parse_fallback(raw).map_err(|_| GenerationError::from(err))
        }
    }
}

fn parse_fallback(payload: &str) -> Result<Vec<Recipe>, InterpretError> {
    let cleaned = strip_code_fences(payload);
    if cleaned.is_empty() {
        return Err(InterpretError::EmptyPayload);
    }
    parse_recipes(&cleaned).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to parse fallback recipe JSON");
    })
}

/// Interpret a plain-text ingredient identification response.
pub fn interpret_ingredients(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
