use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use tourguard_application::SettingsStore;
use tourguard_core::{AppError, AppResult};

/// Process-local settings store.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: String) -> AppResult<()> {
        self.values.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Settings store persisted as one JSON object of key to raw value.
#[derive(Debug)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    /// Creates a store backed by the file at `path`. The file is created on
    /// first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read settings file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(raw.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "settings file '{}' is not a JSON object of strings: {error}",
                self.path.display()
            ))
        })
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> AppResult<()> {
        let encoded = serde_json::to_string_pretty(values).map_err(|error| {
            AppError::Internal(format!("failed to serialize settings file: {error}"))
        })?;
        tokio::fs::write(&self.path, encoded).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write settings file '{}': {error}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), keys = values.len(), "settings file written");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn save(&self, key: &str, value: String) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_owned(), value);
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&values).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tourguard_application::SettingsStore;
    use uuid::Uuid;

    use super::{InMemorySettingsStore, JsonFileSettingsStore};

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("tourguard-settings-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn in_memory_store_round_trips_and_removes() {
        let store = InMemorySettingsStore::new();
        assert!(store.save("authority_settings", "{}".to_owned()).await.is_ok());
        assert!(matches!(store.load("authority_settings").await, Ok(Some(ref value)) if value == "{}"));
        assert!(store.remove("authority_settings").await.is_ok());
        assert!(matches!(store.load("authority_settings").await, Ok(None)));
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let store = JsonFileSettingsStore::new(temp_path());
        assert!(matches!(store.load("authority_settings").await, Ok(None)));
        assert!(store.remove("authority_settings").await.is_ok());
    }

    #[tokio::test]
    async fn file_store_persists_across_instances() {
        let path = temp_path();
        let writer = JsonFileSettingsStore::new(path.clone());
        let saved = writer
            .save("authority_settings", "{\"theme\":\"dark\"}".to_owned())
            .await;
        assert!(saved.is_ok());

        let reader = JsonFileSettingsStore::new(path.clone());
        let loaded = reader.load("authority_settings").await;
        assert!(matches!(loaded, Ok(Some(ref value)) if value.contains("dark")));

        assert!(reader.remove("authority_settings").await.is_ok());
        assert!(matches!(writer.load("authority_settings").await, Ok(None)));
        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let path = temp_path();
        assert!(tokio::fs::write(&path, "not json").await.is_ok());
        let store = JsonFileSettingsStore::new(path.clone());
        assert!(store.load("authority_settings").await.is_err());
        let _ = tokio::fs::remove_file(path).await;
    }
}
