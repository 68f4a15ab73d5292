use std::sync::Arc;

use crate::db::KeyValueStore;
use crate::services::{Catalog, PreferenceStore, RecommendationEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PreferenceStore>,
    pub catalog: Arc<Catalog>,
    pub engine: RecommendationEngine,
    /// Recommendation count when the caller gives none
    pub recommendation_limit: usize,
}

impl AppState {
    /// Wires the preference store and engine over the given backend and catalog
    pub fn new(
        backend: Arc<dyn KeyValueStore>,
        catalog: Catalog,
        recommendation_limit: usize,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            store: Arc::new(PreferenceStore::new(backend)),
            engine: RecommendationEngine::new(catalog.clone()),
            catalog,
            recommendation_limit,
        }
    }
}
