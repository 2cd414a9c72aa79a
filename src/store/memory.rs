use crate::store::Collection;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection backing the ledger unit tests.
pub struct MemoryCollection<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<String, T>>>,
}

impl<T> MemoryCollection<T>
where
    T: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> Default for MemoryCollection<T>
where
    T: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Collection<T> for MemoryCollection<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn insert(&self, id: &str, doc: &T) -> Result<()> {
        let mut docs = self.inner.lock().await;
        debug!("Store PUT {}", id);
        docs.insert(id.to_string(), doc.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let docs = self.inner.lock().await;
        Ok(docs.get(id).cloned())
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let mut docs = self.inner.lock().await;
        debug!("Store REMOVE {}", id);
        Ok(docs.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let docs = self.inner.lock().await;
        Ok(docs.values().cloned().collect())
    }
}
