use serde::Deserialize;
use std::path::PathBuf;

/// Which key-value substrate holds the preference record
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on restart
    Memory,
    /// One file per key on the local disk
    File,
    /// A Redis server
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Persistence substrate for user preferences
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// Directory used by the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Redis connection URL, used by the redis backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Optional JSON catalog replacing the built-in seed talks
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Default number of recommendations returned
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Allowed browser origin; any origin when unset
    #[serde(default)]
    pub cors_origin: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/store")
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_recommendation_limit() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert_eq!(config.recommendation_limit, 5);
        assert!(config.catalog_path.is_none());
        assert!(config.cors_origin.is_none());
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("STORAGE_BACKEND".to_string(), "redis".to_string()),
            ("RECOMMENDATION_LIMIT".to_string(), "3".to_string()),
            ("CATALOG_PATH".to_string(), "/tmp/talks.json".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_backend, StorageBackend::Redis);
        assert_eq!(config.recommendation_limit, 3);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/talks.json")));
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }
}
