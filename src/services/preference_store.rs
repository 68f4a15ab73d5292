use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    db::{KeyValueStore, StorageKey},
    models::{SwipeDirection, UserPreferences},
};

/// Owns the single persisted [`UserPreferences`] record
///
/// Every mutation is load, modify, save of the whole record. The store holds
/// an async mutex across that sequence, so two concurrent mutations cannot
/// overwrite each other. Storage failures never reach the caller: a failed or
/// corrupt load yields defaults, a failed save is logged and dropped.
pub struct PreferenceStore {
    backend: Arc<dyn KeyValueStore>,
    key: StorageKey,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            key: StorageKey::Preferences,
            write_lock: Mutex::new(()),
        }
    }

    /// Reads the stored record, falling back to empty defaults
    pub async fn load(&self) -> UserPreferences {
        let key = self.key.to_string();
        let raw = match self.backend.get(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, backend = self.backend.name(), "Failed to load preferences");
                return UserPreferences::default();
            }
        };

        match raw {
            Some(json) if !json.is_empty() => match serde_json::from_str(&json) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::error!(error = %e, "Stored preferences are corrupt, using defaults");
                    UserPreferences::default()
                }
            },
            _ => UserPreferences::default(),
        }
    }

    /// Writes the whole record; failures are logged and otherwise ignored
    pub async fn save(&self, prefs: &UserPreferences) {
        let json = match serde_json::to_string(prefs) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Preference serialization error");
                return;
            }
        };

        if let Err(e) = self.backend.set(&self.key.to_string(), json).await {
            tracing::error!(error = %e, backend = self.backend.name(), "Failed to save preferences");
        }
    }

    /// Runs `apply` on the stored record inside the write lock and saves it
    /// when `apply` reports a change. Returns the record as this mutation left
    /// it, even if the save was dropped.
    async fn mutate<F>(&self, apply: F) -> UserPreferences
    where
        F: FnOnce(&mut UserPreferences) -> bool,
    {
        let _guard = self.write_lock.lock().await;
        let mut prefs = self.load().await;
        if apply(&mut prefs) {
            self.save(&prefs).await;
        }
        prefs
    }

    pub async fn add_favorite(&self, talk_id: &str) -> UserPreferences {
        let prefs = self.mutate(|prefs| prefs.add_favorite(talk_id)).await;
        tracing::debug!(talk_id, "Favorite added");
        prefs
    }

    pub async fn remove_favorite(&self, talk_id: &str) -> UserPreferences {
        let prefs = self
            .mutate(|prefs| {
                prefs.remove_favorite(talk_id);
                true
            })
            .await;
        tracing::debug!(talk_id, "Favorite removed");
        prefs
    }

    /// Marks a talk as seen; repeat swipes of the same id change nothing
    pub async fn record_swipe(&self, talk_id: &str) -> UserPreferences {
        let prefs = self.mutate(|prefs| prefs.record_swipe(talk_id)).await;
        tracing::debug!(talk_id, swipe_count = prefs.swipe_count, "Swipe recorded");
        prefs
    }

    pub async fn toggle_topic(&self, topic: &str) -> UserPreferences {
        self.mutate(|prefs| {
            prefs.toggle_topic(topic);
            true
        })
        .await
    }

    /// Records the swipe and, for a right swipe, likes the talk, as one
    /// load-modify-save
    pub async fn swipe(&self, talk_id: &str, direction: SwipeDirection) -> UserPreferences {
        let prefs = self
            .mutate(|prefs| {
                let swiped = prefs.record_swipe(talk_id);
                let liked = direction == SwipeDirection::Right && prefs.add_favorite(talk_id);
                swiped || liked
            })
            .await;
        tracing::debug!(
            talk_id,
            direction = ?direction,
            swipe_count = prefs.swipe_count,
            "Swipe applied"
        );
        prefs
    }

    pub async fn is_favorite(&self, talk_id: &str) -> bool {
        self.load().await.is_favorite(talk_id)
    }
}
