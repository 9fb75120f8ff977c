use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tourguard_application::RecordStore;
use tourguard_core::AppResult;

/// In-memory copy-on-write record collection.
#[derive(Debug)]
pub struct InMemoryRecordStore<R> {
    records: RwLock<Arc<Vec<R>>>,
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryRecordStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store holding the given records.
    #[must_use]
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: RwLock::new(Arc::new(records)),
        }
    }
}

#[async_trait]
impl<R: Send + Sync + 'static> RecordStore<R> for InMemoryRecordStore<R> {
    async fn snapshot(&self) -> AppResult<Arc<Vec<R>>> {
        Ok(self.records.read().await.clone())
    }

    async fn replace(&self, records: Vec<R>) -> AppResult<Arc<Vec<R>>> {
        let snapshot = Arc::new(records);
        *self.records.write().await = snapshot.clone();
        Ok(snapshot)
    }
}
