use std::sync::Arc;

use thiserror::Error;

use crate::ai::AiError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown dietary preference: {0}")]
    UnknownDietaryPreference(String),

    #[error("Unknown cooking time: {0}")]
    UnknownCookingTime(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),

    #[error("Failed to read image: {0}")]
    Unreadable(String),

    #[error("Failed to open image file: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a model response could not be turned into recipes.
#[derive(Error, Debug)]
pub enum InterpretError {
    #[error("Response is not a valid recipe array: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Recipe has an empty id")]
    EmptyId,

    #[error("Duplicate recipe id in response: {0}")]
    DuplicateId(String),

    #[error("Recipe {id} has no servings")]
    InvalidServings { id: String },

    #[error("Response contained no payload")]
    EmptyPayload,
}

#[derive(Error, Debug)]
pub enum GenerationCause {
    #[error(transparent)]
    Model(#[from] AiError),

    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

/// Recipe generation failed after the fallback parse. Carries the first failure.
#[derive(Error, Debug)]
#[error("Failed to generate and parse recipes: {cause}")]
pub struct GenerationError {
    #[source]
    pub cause: GenerationCause,
}

impl From<AiError> for GenerationError {
    fn from(err: AiError) -> Self {
        Self {
            cause: GenerationCause::Model(err),
        }
    }
}

impl From<InterpretError> for GenerationError {
    fn from(err: InterpretError) -> Self {
        Self {
            cause: GenerationCause::Interpret(err),
        }
    }
}

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error(transparent)]
    Model(#[from] AiError),

    #[error("Model returned no ingredients")]
    Empty,
}

/// Input problems caught before any model call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("Please provide ingredients by uploading an image or typing them in.")]
    MissingIngredients,

    #[error("Please rate (4+ stars) or favorite at least one recipe to get personalized suggestions.")]
    NoLikedRecipes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Recipes,
    Suggestions,
}

/// The single user-visible error slot of a session.
///
/// `Display` is the user-facing message. Underlying causes come from `source()`.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("Failed to identify ingredients. Please try again or enter them manually.")]
    ImageIdentificationFailed(#[source] Arc<IdentifyError>),

    #[error("{0}")]
    ValidationFailed(ValidationFailure),

    #[error("{}", generation_message(.kind))]
    GenerationFailed {
        kind: GenerationKind,
        #[source]
        source: Arc<GenerationError>,
    },
}

fn generation_message(kind: &GenerationKind) -> &'static str {
    match kind {
        GenerationKind::Recipes => {
            "Could not generate recipes. The model might be busy. Please try again."
        }
        GenerationKind::Suggestions => {
            "Sorry, we couldn't get suggestions right now. Please try again later."
        }
    }
}

impl SessionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::ValidationFailed(_))
    }
}
