//! Terminal rendering of recipes, filter state and cycle progress.

use std::time::Duration;

use pantry_core::{
    difficulty_filter_label, CookingTime, CycleStateHandle, DietaryPreference, Difficulty,
    Filters, Recipe, UserRecipePreference,
};
use tokio::task::JoinHandle;

/// Print each loading message to stderr as the cycle moves through its steps.
///
/// The task runs until aborted.
pub fn spawn_progress(handle: CycleStateHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(100));
        let mut last = None;
        loop {
            ticker.tick().await;
            let message = handle.get().loading_message();
            if let Some(text) = message.filter(|_| message != last) {
                eprintln!("{}", text);
            }
            last = message;
        }
    })
}

/// One line per recipe, numbered from 1.
pub fn print_recipe_list(recipes: &[Recipe], preference: impl Fn(&str) -> UserRecipePreference) {
    if recipes.is_empty() {
        println!("  (no recipes)");
        return;
    }

    for (i, recipe) in recipes.iter().enumerate() {
        let pref = preference(&recipe.id);
        println!(
            "  {:>2}. {}{}  [{} | {} | serves {}]{}",
            i + 1,
            if pref.favorite { "* " } else { "" },
            recipe.recipe_name,
            recipe.cooking_time,
            recipe.difficulty,
            recipe.servings,
            rating_suffix(&pref),
        );
    }
}

fn rating_suffix(pref: &UserRecipePreference) -> String {
    match pref.rating {
        Some(rating) => format!("  {}/5", rating),
        None => String::new(),
    }
}

pub fn print_recipe(recipe: &Recipe, pref: &UserRecipePreference) {
    println!();
    println!("{}{}", recipe.recipe_name, if pref.favorite { " (favorite)" } else { "" });
    println!("{}", "=".repeat(recipe.recipe_name.len()));
    println!("{}", recipe.description);
    println!();
    println!(
        "Time: {}   Difficulty: {}   Servings: {}{}",
        recipe.cooking_time,
        recipe.difficulty,
        recipe.servings,
        rating_suffix(pref)
    );

    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {}", ingredient);
    }

    println!();
    println!("Instructions:");
    for (i, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    let n = &recipe.nutritional_info;
    println!();
    println!(
        "Nutrition: {} calories, {} protein, {} carbs, {} fat",
        n.calories, n.protein, n.carbs, n.fat
    );
    println!();
}

pub fn print_filters(filters: &Filters) {
    if filters.is_default() {
        println!("  No filters: any diet, time and difficulty");
        return;
    }
    let dietary: Vec<&str> = filters.dietary().iter().map(|p| p.label()).collect();
    println!(
        "  Dietary: {}",
        if dietary.is_empty() {
            "none".to_string()
        } else {
            dietary.join(", ")
        }
    );
    println!("  Cooking time: {}", filters.cooking_time.label());
    println!("  Difficulty: {}", difficulty_filter_label(filters.difficulty));
}

pub fn print_catalog() {
    println!("Dietary preferences:");
    for pref in DietaryPreference::ALL {
        println!("  {:<12} {}", pref.id(), pref.label());
    }
    println!("Cooking times:");
    for time in CookingTime::ALL {
        println!("  {:<12} {}", time.id(), time.label());
    }
    println!("Difficulty:");
    println!("  {}", difficulty_filter_label(None));
    for difficulty in Difficulty::ALL {
        println!("  {}", difficulty);
    }
}
