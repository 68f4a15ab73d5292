use redis::AsyncCommands;
use redis::Client;

use crate::db::KeyValueStore;
use crate::error::AppResult;

/// Creates a Redis client for preference storage
///
/// The client is cheap to clone; connections are opened per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Key-value store backed by a Redis server
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
}

impl RedisStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    /// Retrieves the raw text stored under `key`
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Writes the value without expiry; preferences live until overwritten
    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
