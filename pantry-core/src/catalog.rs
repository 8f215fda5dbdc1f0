//! Static filter options offered to the user.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::types::Difficulty;

/// Sentinel accepted wherever a difficulty filter is expected, meaning "no constraint".
pub const ANY_DIFFICULTY: &str = "Any";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    LowCarb,
}

impl DietaryPreference {
    pub const ALL: &'static [DietaryPreference] = &[
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::DairyFree,
        DietaryPreference::LowCarb,
    ];

    /// Identifier used in prompts and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::GlutenFree => "gluten-free",
            DietaryPreference::DairyFree => "dairy-free",
            DietaryPreference::LowCarb => "low-carb",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "Vegetarian",
            DietaryPreference::Vegan => "Vegan",
            DietaryPreference::GlutenFree => "Gluten-Free",
            DietaryPreference::DairyFree => "Dairy-Free",
            DietaryPreference::LowCarb => "Low-Carb",
        }
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DietaryPreference {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DietaryPreference::ALL
            .iter()
            .copied()
            .find(|p| p.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownDietaryPreference(s.to_string()))
    }
}

/// Cooking time buckets. `Any` is the "no constraint" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CookingTime {
    #[default]
    Any,
    Under30,
    From30To60,
    Over60,
}

impl CookingTime {
    pub const ALL: &'static [CookingTime] = &[
        CookingTime::Any,
        CookingTime::Under30,
        CookingTime::From30To60,
        CookingTime::Over60,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CookingTime::Any => "any",
            CookingTime::Under30 => "under-30",
            CookingTime::From30To60 => "30-60",
            CookingTime::Over60 => "over-60",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CookingTime::Any => "Any Time",
            CookingTime::Under30 => "Under 30 mins",
            CookingTime::From30To60 => "30-60 mins",
            CookingTime::Over60 => "Over 60 mins",
        }
    }
}

impl fmt::Display for CookingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CookingTime {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CookingTime::ALL
            .iter()
            .copied()
            .find(|t| t.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownCookingTime(s.to_string()))
    }
}

/// Parse a difficulty filter, where [`ANY_DIFFICULTY`] maps to `None`.
pub fn parse_difficulty_filter(s: &str) -> Result<Option<Difficulty>, CatalogError> {
    if s.trim().eq_ignore_ascii_case(ANY_DIFFICULTY) {
        return Ok(None);
    }
    s.parse().map(Some)
}

/// Render a difficulty filter back to its catalog form.
pub fn difficulty_filter_label(difficulty: Option<Difficulty>) -> &'static str {
    difficulty.map(|d| d.as_str()).unwrap_or(ANY_DIFFICULTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dietary_round_trip_ids() {
        for pref in DietaryPreference::ALL {
            assert_eq!(pref.id().parse::<DietaryPreference>().unwrap(), *pref);
        }
        assert_eq!(DietaryPreference::ALL.len(), 5);
    }

    #[test]
    fn test_unknown_dietary_preference() {
        let err = "paleo".parse::<DietaryPreference>().unwrap_err();
        assert!(err.to_string().contains("paleo"));
    }

    #[test]
    fn test_cooking_time_parse() {
        assert_eq!("UNDER-30".parse::<CookingTime>().unwrap(), CookingTime::Under30);
        assert_eq!(CookingTime::default(), CookingTime::Any);
        assert!("under 30".parse::<CookingTime>().is_err());
    }

    #[test]
    fn test_difficulty_filter() {
        assert_eq!(parse_difficulty_filter("Any").unwrap(), None);
        assert_eq!(
            parse_difficulty_filter("hard").unwrap(),
            Some(Difficulty::Hard)
        );
        assert!(parse_difficulty_filter("impossible").is_err());
        assert_eq!(difficulty_filter_label(None), "Any");
    }
}
