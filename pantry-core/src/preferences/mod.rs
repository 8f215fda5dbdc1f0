//! Persisted favorites, ratings and wishlist.

mod storage;
mod store;

pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{PreferenceStore, PREFERENCES_KEY, WISHLIST_KEY};
