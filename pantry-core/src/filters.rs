use crate::catalog::{CookingTime, DietaryPreference};
use crate::types::Difficulty;

/// The user's current filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub(crate) dietary: Vec<DietaryPreference>,
    pub cooking_time: CookingTime,
    /// `None` means any difficulty.
    pub difficulty: Option<Difficulty>,
}

impl Filters {
    /// Selected dietary preferences, in selection order.
    pub fn dietary(&self) -> &[DietaryPreference] {
        &self.dietary
    }

    /// Select the preference if absent, deselect it if present.
    ///
    /// Returns whether the preference is selected afterwards.
    pub fn toggle_dietary(&mut self, preference: DietaryPreference) -> bool {
        if let Some(pos) = self.dietary.iter().position(|p| *p == preference) {
            self.dietary.remove(pos);
            false
        } else {
            self.dietary.push(preference);
            true
        }
    }

    /// Replace the dietary selection, dropping repeats.
    pub fn set_dietary(&mut self, preferences: impl IntoIterator<Item = DietaryPreference>) {
        self.dietary.clear();
        for preference in preferences {
            if !self.dietary.contains(&preference) {
                self.dietary.push(preference);
            }
        }
    }

    pub fn is_default(&self) -> bool {
        self.dietary.is_empty() && self.cooking_time == CookingTime::Any && self.difficulty.is_none()
    }
}

/// Everything needed to build a generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub ingredients: String,
    pub filters: Filters,
}

impl GenerationRequest {
    pub fn new(ingredients: impl Into<String>, filters: Filters) -> Self {
        Self {
            ingredients: ingredients.into(),
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_dietary() {
        let mut filters = Filters::default();
        assert!(filters.toggle_dietary(DietaryPreference::Vegan));
        assert!(filters.toggle_dietary(DietaryPreference::LowCarb));
        assert!(!filters.toggle_dietary(DietaryPreference::Vegan));
        assert_eq!(filters.dietary(), &[DietaryPreference::LowCarb]);
    }

    #[test]
    fn test_set_dietary_dedupes() {
        let mut filters = Filters::default();
        filters.set_dietary([
            DietaryPreference::Vegan,
            DietaryPreference::GlutenFree,
            DietaryPreference::Vegan,
        ]);
        assert_eq!(
            filters.dietary(),
            &[DietaryPreference::Vegan, DietaryPreference::GlutenFree]
        );
        assert!(!filters.is_default());
    }
}
