use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{AppError, AppResult};

use super::KeyValueStore;

/// Stores each key as a file inside a directory on the local disk
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory when missing
    pub async fn open(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        tracing::debug!(path = %root.display(), "File store opened");
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::InvalidInput(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let path = self.path_for(key)?;
        // Readers only ever see a complete record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("talkmatch-preferences").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).await.unwrap();
            store
                .set("talkmatch-preferences", r#"{"swipeCount":3}"#.to_string())
                .await
                .unwrap();
        }

        let reopened = FileStore::open(dir.path()).await.unwrap();
        let value = reopened.get("talkmatch-preferences").await.unwrap();
        assert_eq!(value, Some(r#"{"swipeCount":3}"#.to_string()));
    }

    #[tokio::test]
    async fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        FileStore::open(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let result = store.set("../escape", "x".to_string()).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
