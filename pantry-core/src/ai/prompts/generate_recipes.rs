//! Prompt for generating recipes from a list of ingredients.

use std::fmt::Write as _;

use crate::catalog::{CookingTime, DietaryPreference};
use crate::filters::{Filters, GenerationRequest};

/// Prompt name for logs and cache keys.
pub const GENERATE_RECIPES_PROMPT_NAME: &str = "generate_recipes";

/// How many recipes each prompt asks for.
pub const RECIPE_COUNT: usize = 3;

const CLOSING_CLAUSE: &str = " For each recipe, provide a detailed ingredients list, step-by-step instructions, and estimated nutritional information (calories, protein, carbs, fat). Also suggest a suitable number of servings.";

pub fn render_generate_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Generate {RECIPE_COUNT} diverse recipes based on the following ingredients: {}.",
        request.ingredients
    );
    push_filter_clauses(&mut prompt, &request.filters);
    prompt
}

/// Append the clauses for non-default filters, then the closing requirements.
pub(crate) fn push_filter_clauses(prompt: &mut String, filters: &Filters) {
    if !filters.dietary().is_empty() {
        let _ = write!(
            prompt,
            " The recipes must be suitable for the following dietary needs: {}.",
            join_dietary(filters.dietary())
        );
    }

    if filters.cooking_time != CookingTime::Any {
        let _ = write!(
            prompt,
            " The cooking time should be {}.",
            filters.cooking_time.id().replace('-', " ")
        );
    }

    if let Some(difficulty) = filters.difficulty {
        let _ = write!(prompt, " The difficulty level should be {}.", difficulty);
    }

    prompt.push_str(CLOSING_CLAUSE);
}

fn join_dietary(preferences: &[DietaryPreference]) -> String {
    let mut ids: Vec<&str> = Vec::with_capacity(preferences.len());
    for preference in preferences {
        if !ids.contains(&preference.id()) {
            ids.push(preference.id());
        }
    }
    ids.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Difficulty;

    fn request(filters: Filters) -> GenerationRequest {
        GenerationRequest::new("chicken, rice, broccoli", filters)
    }

    #[test]
    fn test_default_filters_have_no_conditional_clauses() {
        let prompt = render_generate_prompt(&request(Filters::default()));

        assert_eq!(
            prompt,
            format!(
                "Generate 3 diverse recipes based on the following ingredients: chicken, rice, broccoli.{}",
                CLOSING_CLAUSE
            )
        );
        assert!(!prompt.contains("dietary"));
        assert!(!prompt.contains("cooking time"));
        assert!(!prompt.contains("difficulty level"));
    }

    #[test]
    fn test_dietary_ids_joined() {
        let mut filters = Filters::default();
        filters.set_dietary([DietaryPreference::Vegan, DietaryPreference::GlutenFree]);

        let prompt = render_generate_prompt(&request(filters));
        assert!(prompt.contains("following dietary needs: vegan, gluten-free."));
    }

    #[test]
    fn test_cooking_time_hyphen_replaced() {
        let filters = Filters {
            cooking_time: CookingTime::Under30,
            ..Default::default()
        };

        let prompt = render_generate_prompt(&request(filters));
        assert!(prompt.contains("The cooking time should be under 30."));
        assert!(!prompt.contains("under-30"));
    }

    #[test]
    fn test_difficulty_clause() {
        let filters = Filters {
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };

        let prompt = render_generate_prompt(&request(filters));
        assert!(prompt.contains("The difficulty level should be Hard."));
    }

    #[test]
    fn test_clause_order() {
        let mut filters = Filters {
            cooking_time: CookingTime::Over60,
            difficulty: Some(Difficulty::Medium),
            ..Default::default()
        };
        filters.toggle_dietary(DietaryPreference::LowCarb);

        let prompt = render_generate_prompt(&request(filters));
        let dietary = prompt.find("dietary needs").unwrap();
        let time = prompt.find("over 60").unwrap();
        let difficulty = prompt.find("difficulty level").unwrap();
        let closing = prompt.find("For each recipe").unwrap();
        assert!(dietary < time && time < difficulty && difficulty < closing);
    }

    #[test]
    fn test_join_dietary_drops_repeats() {
        assert_eq!(
            join_dietary(&[
                DietaryPreference::Vegan,
                DietaryPreference::Vegan,
                DietaryPreference::DairyFree
            ]),
            "vegan, dairy-free"
        );
    }
}
