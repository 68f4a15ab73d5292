pub mod catalog;
pub mod preference_store;
pub mod recommendations;

pub use catalog::Catalog;
pub use preference_store::PreferenceStore;
pub use recommendations::RecommendationEngine;
