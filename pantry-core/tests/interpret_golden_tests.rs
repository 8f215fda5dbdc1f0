//! Golden file tests for model response interpretation.
//!
//! Each `*.json` case in `fixtures/responses/` names a raw response file and the
//! recipes (or failure) expected from interpreting it.

use pantry_core::ai::interpret::interpret_completion;
use pantry_core::ai::{AiError, ChatResponse};
use pantry_core::GenerationCause;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A test case loaded from a JSON fixture file
#[derive(Debug, Deserialize)]
struct TestCase {
    /// Raw response file, relative to the fixtures directory
    response_fixture: String,
    /// Deliver the text as the partial output of a truncated call
    #[serde(default)]
    incomplete: bool,
    #[serde(default)]
    expected: Option<ExpectedRecipes>,
    /// "interpret" or "model"
    #[serde(default)]
    expected_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpectedRecipes {
    recipe_ids: Vec<String>,
    #[serde(default)]
    first_recipe_name: Option<String>,
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/responses")
}

/// Load all test cases from the fixtures directory
fn load_test_cases() -> Vec<(String, TestCase)> {
    let dir = fixtures_dir();
    let mut cases = Vec::new();

    for entry in fs::read_dir(&dir).expect("Failed to read fixtures directory") {
        let path = entry.expect("Failed to read directory entry").path();

        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            let case: TestCase = serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
            cases.push((name, case));
        }
    }

    assert!(!cases.is_empty(), "No test fixtures found in {:?}", dir);
    cases.sort_by(|a, b| a.0.cmp(&b.0));
    cases
}

#[test]
fn test_interpret_golden_files() {
    for (name, case) in load_test_cases() {
        println!("Testing: {}", name);

        let raw_path = fixtures_dir().join(&case.response_fixture);
        let raw = fs::read_to_string(&raw_path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", raw_path.display(), e));

        let outcome = if case.incomplete {
            Err(AiError::Incomplete {
                reason: "MAX_TOKENS".to_string(),
                partial_text: Some(raw),
            })
        } else {
            Ok(ChatResponse::text(raw))
        };
        let result = interpret_completion(outcome);

        match (&case.expected, &case.expected_error) {
            (Some(expected), None) => {
                let recipes = result.unwrap_or_else(|e| panic!("[{}] expected recipes, got {}", name, e));
                let ids: Vec<_> = recipes.iter().map(|r| r.id.clone()).collect();
                assert_eq!(ids, expected.recipe_ids, "[{}] recipe ids", name);

                if let Some(first_name) = &expected.first_recipe_name {
                    assert_eq!(&recipes[0].recipe_name, first_name, "[{}] first recipe name", name);
                }
                for recipe in &recipes {
                    assert!(recipe.servings >= 1, "[{}] servings for {}", name, recipe.id);
                    assert!(!recipe.ingredients.is_empty(), "[{}] ingredients for {}", name, recipe.id);
                }
            }
            (None, Some(kind)) => {
                let err = match result {
                    Ok(recipes) => panic!("[{}] expected failure, got {} recipes", name, recipes.len()),
                    Err(e) => e,
                };
                let actual = match err.cause {
                    GenerationCause::Interpret(_) => "interpret",
                    GenerationCause::Model(_) => "model",
                };
                assert_eq!(actual, kind, "[{}] failure kind", name);
            }
            _ => panic!("[{}] case must set exactly one of expected / expected_error", name),
        }
    }
}

#[test]
fn test_fenced_and_plain_fixtures_agree() {
    let read = |file: &str| fs::read_to_string(fixtures_dir().join(file)).unwrap();

    let plain = interpret_completion(Ok(ChatResponse::text(read("plain.txt")))).unwrap();
    let fenced = interpret_completion(Ok(ChatResponse::text(read("fenced.txt")))).unwrap();
    assert_eq!(plain, fenced);
}
