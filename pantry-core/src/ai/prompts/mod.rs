//! AI prompt templates and the response schema sent with them.

pub mod generate_recipes;
pub mod identify_ingredients;
pub mod schema;
pub mod suggest_recipes;

pub use generate_recipes::{render_generate_prompt, GENERATE_RECIPES_PROMPT_NAME, RECIPE_COUNT};
pub use identify_ingredients::{render_identify_prompt, IDENTIFY_INGREDIENTS_PROMPT_NAME};
pub use schema::recipe_array_schema;
pub use suggest_recipes::{render_suggest_prompt, SUGGEST_RECIPES_PROMPT_NAME};
