use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// How hard a recipe is to cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties in catalog order.
    pub const ALL: &'static [Difficulty] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownDifficulty(s.to_string()))
    }
}

/// Estimated nutrition per serving, as free-form labels from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

/// A generated recipe.
///
/// Field names match the model's response schema and the persisted wishlist format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub recipe_name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_time: String,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub nutritional_info: NutritionalInfo,
}

/// A star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Ratings at or above this count as "liked" for suggestions.
    pub const LIKED_THRESHOLD: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| {
            format!(
                "rating must be between {} and {}, got {}",
                Rating::MIN,
                Rating::MAX,
                value
            )
        })
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-recipe user state. A missing record means `favorite: false` with no rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecipePreference {
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl UserRecipePreference {
    /// Whether this recipe should seed personalized suggestions.
    pub fn is_liked(&self) -> bool {
        self.favorite
            || self
                .rating
                .is_some_and(|r| r.value() >= Rating::LIKED_THRESHOLD)
    }

    /// Shallow merge: fields present in `update` overwrite ours.
    pub fn merged(self, update: PreferenceUpdate) -> Self {
        Self {
            favorite: update.favorite.unwrap_or(self.favorite),
            rating: update.rating.or(self.rating),
        }
    }
}

/// A partial update to a [`UserRecipePreference`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceUpdate {
    pub favorite: Option<bool>,
    pub rating: Option<Rating>,
}

impl PreferenceUpdate {
    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            rating: None,
        }
    }

    pub fn rating(rating: Rating) -> Self {
        Self {
            favorite: None,
            rating: Some(rating),
        }
    }
}
