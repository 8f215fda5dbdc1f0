pub mod ai;
pub mod catalog;
pub mod error;
pub mod filters;
pub mod image;
pub mod preferences;
pub mod session;
pub mod types;

pub use catalog::{
    difficulty_filter_label, parse_difficulty_filter, CookingTime, DietaryPreference,
    ANY_DIFFICULTY,
};
pub use error::{
    CatalogError, GenerationCause, GenerationError, GenerationKind, IdentifyError, ImageError,
    InterpretError, SessionError, StorageError, ValidationFailure,
};
pub use filters::{Filters, GenerationRequest};
pub use self::image::{
    image_from_bytes, load_image, validate_image, ALLOWED_FORMATS, MAX_FILE_SIZE,
};
pub use preferences::{
    FileStore, KeyValueStore, MemoryStore, PreferenceStore, PREFERENCES_KEY, WISHLIST_KEY,
};
pub use session::{ActiveView, CycleState, CycleStateHandle, Session};
pub use types::{
    Difficulty, NutritionalInfo, PreferenceUpdate, Rating, Recipe, UserRecipePreference,
};
