//! One user's recipe session: inputs, filters, results and the generate/suggest cycle.
//!
//! A cycle is a single `generate` or `suggest` call. Cycle methods take `&mut self`,
//! so only one runs at a time. While a cycle is running its step is visible through
//! [`Session::state_handle`], and the step always returns to [`CycleState::Idle`]
//! when the cycle ends, including when the future is dropped mid-call.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ai::{generate_recipes, identify_ingredients, suggest_recipes, AiClient, ImageData};
use crate::catalog::{CookingTime, DietaryPreference};
use crate::error::{GenerationKind, SessionError, StorageError, ValidationFailure};
use crate::filters::{Filters, GenerationRequest};
use crate::preferences::{KeyValueStore, PreferenceStore};
use crate::types::{Difficulty, Rating, Recipe, UserRecipePreference};

/// Which step of a cycle is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleState {
    #[default]
    Idle,
    IdentifyingImage,
    GeneratingRecipes,
    GeneratingSuggestions,
}

impl CycleState {
    /// Text to show while this step runs.
    pub fn loading_message(&self) -> Option<&'static str> {
        match self {
            CycleState::Idle => None,
            CycleState::IdentifyingImage => Some("Analyzing ingredients from image..."),
            CycleState::GeneratingRecipes => Some("Generating creative recipes for you..."),
            CycleState::GeneratingSuggestions => Some("Finding new recipes you'll love..."),
        }
    }

    pub fn is_loading(&self) -> bool {
        *self != CycleState::Idle
    }
}

/// Shared read access to a session's cycle state.
#[derive(Debug, Clone, Default)]
pub struct CycleStateHandle(Arc<Mutex<CycleState>>);

impl CycleStateHandle {
    pub fn get(&self) -> CycleState {
        *self.lock()
    }

    fn set(&self, state: CycleState) {
        *self.lock() = state;
    }

    fn lock(&self) -> MutexGuard<'_, CycleState> {
        // The guarded value is a plain Copy enum, so a poisoned lock is still usable.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds the cycle state for the duration of a cycle and resets it to idle on drop.
struct LoadingGuard<'a> {
    handle: &'a CycleStateHandle,
}

impl<'a> LoadingGuard<'a> {
    fn enter(handle: &'a CycleStateHandle, state: CycleState) -> Self {
        handle.set(state);
        Self { handle }
    }

    fn advance(&self, state: CycleState) {
        self.handle.set(state);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.handle.set(CycleState::Idle);
    }
}

/// Which list the front-end shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveView {
    #[default]
    All,
    Wishlist,
}

pub struct Session<C, S> {
    client: C,
    store: PreferenceStore<S>,
    ingredients: String,
    image: Option<ImageData>,
    filters: Filters,
    recipes: Vec<Recipe>,
    view: ActiveView,
    selected: Option<String>,
    state: CycleStateHandle,
    error: Option<SessionError>,
}

impl<C: AiClient, S: KeyValueStore> Session<C, S> {
    pub fn new(client: C, store: PreferenceStore<S>) -> Self {
        Self {
            client,
            store,
            ingredients: String::new(),
            image: None,
            filters: Filters::default(),
            recipes: Vec::new(),
            view: ActiveView::All,
            selected: None,
            state: CycleStateHandle::default(),
            error: None,
        }
    }

    /// Run a generation cycle: identify the photo if one is attached, then
    /// replace the active list with freshly generated recipes.
    pub async fn generate(&mut self) -> Result<(), SessionError> {
        self.error = None;
        self.recipes.clear();
        self.selected = None;
        self.view = ActiveView::All;

        let result = self.run_generate().await;
        self.record(result)
    }

    async fn run_generate(&mut self) -> Result<(), SessionError> {
        let first = if self.image.is_some() {
            CycleState::IdentifyingImage
        } else {
            CycleState::GeneratingRecipes
        };
        let loading = LoadingGuard::enter(&self.state, first);

        if let Some(image) = &self.image {
            let identified = identify_ingredients(&self.client, image)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Ingredient identification failed");
                    SessionError::ImageIdentificationFailed(Arc::new(e))
                })?;
            tracing::info!(ingredients = %identified, "Identified ingredients from image");
            self.ingredients = identified;
        }

        if self.ingredients.trim().is_empty() {
            return Err(SessionError::ValidationFailed(
                ValidationFailure::MissingIngredients,
            ));
        }

        loading.advance(CycleState::GeneratingRecipes);
        let request = GenerationRequest::new(self.ingredients.clone(), self.filters.clone());
        let recipes = generate_recipes(&self.client, &request)
            .await
            .map_err(|e| SessionError::GenerationFailed {
                kind: GenerationKind::Recipes,
                source: Arc::new(e),
            })?;

        tracing::info!(count = recipes.len(), "Generated recipes");
        self.recipes = recipes;
        Ok(())
    }

    /// Ask for more recipes like the ones the user liked, appending new ones.
    pub async fn suggest(&mut self) -> Result<(), SessionError> {
        let liked = self.liked_recipes();
        if liked.is_empty() {
            return self.record(Err(SessionError::ValidationFailed(
                ValidationFailure::NoLikedRecipes,
            )));
        }
        if self.ingredients.trim().is_empty() {
            return self.record(Err(SessionError::ValidationFailed(
                ValidationFailure::MissingIngredients,
            )));
        }

        self.error = None;
        let result = self.run_suggest(liked).await;
        self.record(result)
    }

    async fn run_suggest(&mut self, liked: Vec<Recipe>) -> Result<(), SessionError> {
        let _loading = LoadingGuard::enter(&self.state, CycleState::GeneratingSuggestions);

        let request = GenerationRequest::new(self.ingredients.clone(), self.filters.clone());
        let suggestions = suggest_recipes(&self.client, &liked, &request)
            .await
            .map_err(|e| SessionError::GenerationFailed {
                kind: GenerationKind::Suggestions,
                source: Arc::new(e),
            })?;

        let added = merge_new(&mut self.recipes, suggestions);
        tracing::info!(added, total = self.recipes.len(), "Merged suggestions");
        self.view = ActiveView::All;
        Ok(())
    }

    fn record(&mut self, result: Result<(), SessionError>) -> Result<(), SessionError> {
        if let Err(e) = &result {
            if e.is_validation() {
                tracing::warn!(error = %e, "Cycle rejected");
            }
            self.error = Some(e.clone());
        }
        result
    }

    fn liked_recipes(&self) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| self.store.is_liked(&r.id))
            .cloned()
            .collect()
    }

    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    pub fn set_ingredients(&mut self, text: impl Into<String>) {
        self.ingredients = text.into();
    }

    /// Attach a photo to identify on the next `generate`. Clears typed ingredients.
    pub fn attach_image(&mut self, image: ImageData) {
        self.image = Some(image);
        self.ingredients.clear();
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn toggle_dietary(&mut self, preference: DietaryPreference) -> bool {
        self.filters.toggle_dietary(preference)
    }

    pub fn set_cooking_time(&mut self, cooking_time: CookingTime) {
        self.filters.cooking_time = cooking_time;
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.filters.difficulty = difficulty;
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    pub fn set_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    /// The active list or the wishlist, depending on the view.
    pub fn displayed_recipes(&self) -> &[Recipe] {
        match self.view {
            ActiveView::All => &self.recipes,
            ActiveView::Wishlist => self.store.wishlist(),
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn wishlist(&self) -> &[Recipe] {
        self.store.wishlist()
    }

    /// Active recipes that are favorites or rated 4 stars or more.
    pub fn liked_recipe_count(&self) -> usize {
        self.recipes
            .iter()
            .filter(|r| self.store.is_liked(&r.id))
            .count()
    }

    pub fn can_suggest(&self) -> bool {
        !self.loading() && self.liked_recipe_count() > 0
    }

    /// Select a displayed recipe by id. Returns false when it is not displayed.
    pub fn select(&mut self, id: &str) -> bool {
        let found = self.displayed_recipes().iter().any(|r| r.id == id);
        self.selected = found.then(|| id.to_string());
        found
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Recipe> {
        let id = self.selected.as_deref()?;
        self.find(id)
    }

    fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes
            .iter()
            .chain(self.store.wishlist())
            .find(|r| r.id == id)
    }

    /// Toggle the favorite flag of a recipe in the active list or wishlist.
    ///
    /// Returns `Ok(None)` when no such recipe is known.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<Option<bool>, StorageError> {
        let Some(recipe) = self.find(id).cloned() else {
            return Ok(None);
        };
        self.store.toggle_favorite(&recipe).map(Some)
    }

    pub fn set_rating(
        &mut self,
        id: &str,
        rating: Rating,
    ) -> Result<UserRecipePreference, StorageError> {
        self.store.set_rating(id, rating)
    }

    pub fn preference(&self, id: &str) -> UserRecipePreference {
        self.store.get(id)
    }

    pub fn store(&self) -> &PreferenceStore<S> {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn state(&self) -> CycleState {
        self.state.get()
    }

    /// A handle for observing the cycle state from elsewhere while a cycle runs.
    pub fn state_handle(&self) -> CycleStateHandle {
        self.state.clone()
    }

    pub fn loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        self.state().loading_message()
    }
}

/// Append recipes whose id is not yet present, keeping order. Returns how many were added.
fn merge_new(recipes: &mut Vec<Recipe>, incoming: Vec<Recipe>) -> usize {
    let mut seen: HashSet<String> = recipes.iter().map(|r| r.id.clone()).collect();
    let before = recipes.len();
    recipes.extend(incoming.into_iter().filter(|r| seen.insert(r.id.clone())));
    recipes.len() - before
}
