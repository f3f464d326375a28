use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;
use tracing::debug;

use crate::{config::get_data_dir, error::Result};

/// JSON-file key-value store, the terminal counterpart of browser local storage.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the configured data directory.
    pub fn open_default() -> Self {
        Self::new(get_store_path(&get_data_dir()))
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    pub async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value);
        self.save(&entries).await
    }

    pub async fn remove(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.load().await?;
        let removed = entries.remove(key);
        if removed.is_some() {
            self.save(&entries).await?;
        }
        Ok(removed)
    }

    async fn load(&self) -> Result<Map<String, Value>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn save(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let pretty_json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, pretty_json).await?;
        debug!(path = %self.path.display(), "local store saved");
        Ok(())
    }
}

pub fn get_store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("local_storage.json")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(get_store_path(&dir.path().join("nested")));

        assert_eq!(store.get("meetingResult").await.unwrap(), None);

        store.set("meetingResult", json!({"summary": "a"})).await.unwrap();
        store.set("other", json!(1)).await.unwrap();
        store.set("meetingResult", json!({"summary": "b"})).await.unwrap();
        assert_eq!(
            store.get("meetingResult").await.unwrap(),
            Some(json!({"summary": "b"}))
        );

        assert_eq!(
            store.remove("meetingResult").await.unwrap(),
            Some(json!({"summary": "b"}))
        );
        assert_eq!(store.remove("meetingResult").await.unwrap(), None);
        assert_eq!(store.get("meetingResult").await.unwrap(), None);
        assert_eq!(store.get("other").await.unwrap(), Some(json!(1)));
    }
}
