use std::{fmt::Display, sync::Arc};

use crate::{
    config::{Config, StorageBackend},
    error::AppResult,
};

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileStore;
pub use memory::InMemoryStore;
pub use self::redis::{create_redis_client, RedisStore};

/// Fixed keys under which records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Preferences,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::Preferences => write!(f, "talkmatch-preferences"),
        }
    }
}

/// Device-scoped key-value persistence substrate
///
/// Implementations may fail (disk full, server unreachable, quota). Callers
/// above this layer decide how to degrade.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the text stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Replaces the text stored under `key`
    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Builds the backend selected in configuration
pub async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::open(&config.data_dir).await?),
        StorageBackend::Redis => Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?)),
    };

    tracing::info!(backend = store.name(), "Preference storage ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_display_preferences() {
        let key = StorageKey::Preferences;
        assert_eq!(format!("{}", key), "talkmatch-preferences");
    }

    #[tokio::test]
    async fn test_create_memory_store() {
        let config: Config =
            envy::from_iter(vec![("STORAGE_BACKEND".to_string(), "memory".to_string())]).unwrap();
        let store = create_store(&config).await.unwrap();
        assert_eq!(store.name(), "memory");
    }
}
