//! Favorites, ratings and the wishlist, persisted through a [`KeyValueStore`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::storage::KeyValueStore;
use crate::error::StorageError;
use crate::types::{PreferenceUpdate, Rating, Recipe, UserRecipePreference};

/// Storage key for the id → preference mapping.
pub const PREFERENCES_KEY: &str = "userRecipePreferences";

/// Storage key for the wishlist recipe snapshots.
pub const WISHLIST_KEY: &str = "wishlistRecipes";

/// In-memory view of the saved preferences. Every mutation rewrites the
/// affected value in full.
#[derive(Debug)]
pub struct PreferenceStore<S> {
    storage: S,
    preferences: BTreeMap<String, UserRecipePreference>,
    wishlist: Vec<Recipe>,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Load saved state. Unreadable or malformed values start empty.
    pub fn open(storage: S) -> Self {
        let preferences = read_or_default(&storage, PREFERENCES_KEY);
        let wishlist = read_or_default(&storage, WISHLIST_KEY);
        Self {
            storage,
            preferences,
            wishlist,
        }
    }

    pub fn get(&self, id: &str) -> UserRecipePreference {
        self.preferences.get(id).copied().unwrap_or_default()
    }

    /// Merge `update` into the preference for `id` and persist the mapping.
    ///
    /// Memory is only updated once the write succeeds.
    pub fn set(
        &mut self,
        id: &str,
        update: PreferenceUpdate,
    ) -> Result<UserRecipePreference, StorageError> {
        let merged = self.get(id).merged(update);
        let mut preferences = self.preferences.clone();
        preferences.insert(id.to_string(), merged);

        write(&mut self.storage, PREFERENCES_KEY, &preferences)?;
        self.preferences = preferences;
        Ok(merged)
    }

    pub fn set_rating(
        &mut self,
        id: &str,
        rating: Rating,
    ) -> Result<UserRecipePreference, StorageError> {
        self.set(id, PreferenceUpdate::rating(rating))
    }

    /// Flip the favorite flag and keep the wishlist in step.
    ///
    /// Returns whether the recipe is a favorite afterwards. When the wishlist
    /// write fails, the saved mapping is restored and memory is left unchanged.
    pub fn toggle_favorite(&mut self, recipe: &Recipe) -> Result<bool, StorageError> {
        let favorite = !self.get(&recipe.id).favorite;

        let mut preferences = self.preferences.clone();
        preferences.insert(
            recipe.id.clone(),
            self.get(&recipe.id).merged(PreferenceUpdate::favorite(favorite)),
        );
        let mut wishlist: Vec<Recipe> = self
            .wishlist
            .iter()
            .filter(|r| r.id != recipe.id)
            .cloned()
            .collect();
        if favorite {
            wishlist.push(recipe.clone());
        }

        write(&mut self.storage, PREFERENCES_KEY, &preferences)?;
        if let Err(e) = write(&mut self.storage, WISHLIST_KEY, &wishlist) {
            if let Err(restore) = write(&mut self.storage, PREFERENCES_KEY, &self.preferences) {
                tracing::warn!(error = %restore, "Failed to restore saved preferences");
            }
            return Err(e);
        }

        self.preferences = preferences;
        self.wishlist = wishlist;
        tracing::debug!(id = %recipe.id, favorite, "Toggled favorite");
        Ok(favorite)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.get(id).is_liked()
    }

    pub fn wishlist(&self) -> &[Recipe] {
        &self.wishlist
    }

    pub fn preferences(&self) -> &BTreeMap<String, UserRecipePreference> {
        &self.preferences
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn read_or_default<S: KeyValueStore, T: DeserializeOwned + Default>(storage: &S, key: &str) -> T {
    let text = match storage.load(key) {
        Ok(Some(text)) => text,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "StorageReadFailed: could not read saved data");
            return T::default();
        }
    };

    serde_json::from_str(&text).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "StorageReadFailed: saved data is malformed");
        T::default()
    })
}

fn write<S: KeyValueStore, T: Serialize>(
    storage: &mut S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let text = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    storage.save(key, &text)
}
