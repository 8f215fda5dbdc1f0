//! Prompt for listing the ingredients visible in a photo.

pub const IDENTIFY_INGREDIENTS_PROMPT_NAME: &str = "identify_ingredients";

pub fn render_identify_prompt() -> String {
    "Identify the food ingredients in this image. List them as a simple, comma-separated string. For example: 'tomatoes, onions, garlic, chicken breast'."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prompt() {
        let prompt = render_identify_prompt();
        assert!(prompt.contains("comma-separated"));
        assert!(prompt.starts_with("Identify the food ingredients"));
    }
}
