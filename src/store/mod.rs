pub mod disk;
pub mod memory;

use anyhow::{Context, Result};
use async_trait::async_trait;
use disk::FjallCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use std::sync::Arc;

/// A named set of JSON documents keyed by id. The ledger keeps one
/// collection per document type (transactions, recurring incomes).
#[async_trait]
pub trait Collection<T>: Send + Sync
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn insert(&self, id: &str, doc: &T) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<T>>;
    /// Removes a document, returning whether it existed.
    async fn remove(&self, id: &str) -> Result<bool>;
    async fn list(&self) -> Result<Vec<T>>;
}

/// Document store over a fjall keyspace, one partition per collection.
pub struct Store {
    keyspace: Arc<Keyspace>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        Ok(Self {
            keyspace: Arc::new(keyspace),
        })
    }

    pub fn collection<T>(&self, name: &str) -> Result<FjallCollection<T>>
    where
        T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
    {
        let partition = self
            .keyspace
            .open_partition(name, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open collection: {name}"))?;
        Ok(FjallCollection::new(partition))
    }
}
