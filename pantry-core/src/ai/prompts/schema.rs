//! Response schema for recipe prompts, in Gemini's `responseSchema` dialect.

use serde_json::{json, Value};

use crate::types::Difficulty;

/// Top-level recipe fields the model must always return.
pub const REQUIRED_RECIPE_FIELDS: &[&str] = &[
    "id",
    "recipeName",
    "description",
    "ingredients",
    "instructions",
    "cookingTime",
    "difficulty",
    "servings",
    "nutritionalInfo",
];

pub fn recipe_array_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": {
                    "type": "STRING",
                    "description": "A unique identifier for the recipe, like a UUID."
                },
                "recipeName": { "type": "STRING" },
                "description": { "type": "STRING" },
                "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                "instructions": { "type": "ARRAY", "items": { "type": "STRING" } },
                "cookingTime": { "type": "STRING" },
                "difficulty": { "type": "STRING", "enum": difficulties },
                "servings": { "type": "INTEGER" },
                "nutritionalInfo": {
                    "type": "OBJECT",
                    "properties": {
                        "calories": { "type": "STRING" },
                        "protein": { "type": "STRING" },
                        "carbs": { "type": "STRING" },
                        "fat": { "type": "STRING" }
                    },
                    "required": ["calories", "protein", "carbs", "fat"]
                }
            },
            "required": REQUIRED_RECIPE_FIELDS
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_required() {
        let schema = recipe_array_schema();
        let item = &schema["items"];

        let required: Vec<&str> = item["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required.len(), 9);

        let properties = item["properties"].as_object().unwrap();
        for field in &required {
            assert!(properties.contains_key(*field), "missing property {}", field);
        }
    }

    #[test]
    fn test_difficulty_enum_and_servings_type() {
        let schema = recipe_array_schema();
        let properties = &schema["items"]["properties"];
        assert_eq!(
            properties["difficulty"]["enum"],
            json!(["Easy", "Medium", "Hard"])
        );
        assert_eq!(properties["servings"]["type"], "INTEGER");
        assert_eq!(schema["type"], "ARRAY");
    }
}
