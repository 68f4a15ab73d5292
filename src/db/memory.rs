use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::AppResult;

use super::KeyValueStore;

/// Process-local store, contents are lost when the process exits
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
