//! Prompt for suggesting new recipes similar to ones the user liked.

use std::fmt::Write as _;

use super::generate_recipes::{push_filter_clauses, RECIPE_COUNT};
use crate::filters::GenerationRequest;
use crate::types::Recipe;

/// Prompt name for logs and cache keys.
pub const SUGGEST_RECIPES_PROMPT_NAME: &str = "suggest_recipes";

pub fn render_suggest_prompt(liked: &[Recipe], request: &GenerationRequest) -> String {
    let mut prompt = String::from("Based on the user's preference for the following recipes:\n");
    for recipe in liked {
        let _ = writeln!(prompt, "- {}: {}", recipe.recipe_name, recipe.description);
    }

    let _ = write!(
        prompt,
        "\nPlease generate {RECIPE_COUNT} new and distinct recipes that they might also enjoy. The new recipes should be based on the following available ingredients: {}.",
        request.ingredients
    );
    push_filter_clauses(&mut prompt, &request.filters);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CookingTime, DietaryPreference};
    use crate::filters::Filters;
    use crate::types::{Difficulty, NutritionalInfo};

    fn recipe(name: &str, description: &str) -> Recipe {
        Recipe {
            id: name.to_lowercase(),
            recipe_name: name.to_string(),
            description: description.to_string(),
            ingredients: vec![],
            instructions: vec![],
            cooking_time: "20 minutes".to_string(),
            difficulty: Difficulty::Easy,
            servings: 2,
            nutritional_info: NutritionalInfo {
                calories: "300".to_string(),
                protein: "10g".to_string(),
                carbs: "40g".to_string(),
                fat: "8g".to_string(),
            },
        }
    }

    #[test]
    fn test_liked_recipes_listed_first() {
        let liked = vec![
            recipe("Shakshuka", "Eggs poached in spiced tomato sauce"),
            recipe("Dal", "Comforting spiced lentils"),
        ];
        let request = GenerationRequest::new("eggs, lentils", Filters::default());

        let prompt = render_suggest_prompt(&liked, &request);
        assert!(prompt.starts_with(
            "Based on the user's preference for the following recipes:\n- Shakshuka: Eggs poached in spiced tomato sauce\n- Dal: Comforting spiced lentils\n\nPlease generate 3 new and distinct recipes"
        ));
        assert!(prompt.contains("available ingredients: eggs, lentils."));
        assert!(prompt.ends_with("suggest a suitable number of servings."));
    }

    #[test]
    fn test_filters_apply_to_suggestions() {
        let mut filters = Filters {
            cooking_time: CookingTime::From30To60,
            ..Default::default()
        };
        filters.toggle_dietary(DietaryPreference::Vegetarian);
        let request = GenerationRequest::new("lentils", filters);

        let prompt = render_suggest_prompt(&[recipe("Dal", "Lentils")], &request);
        assert!(prompt.contains("dietary needs: vegetarian."));
        assert!(prompt.contains("cooking time should be 30 60."));
        assert!(!prompt.contains("difficulty level"));
    }
}
