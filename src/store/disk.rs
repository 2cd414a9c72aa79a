use crate::store::Collection;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::PartitionHandle;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use tracing::debug;

/// Persistent collection over one fjall partition; values are JSON
/// documents, keys are the document ids.
pub struct FjallCollection<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    partition: PartitionHandle,
    _marker: PhantomData<T>,
}

impl<T> FjallCollection<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn new(partition: PartitionHandle) -> Self {
        Self {
            partition,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> Collection<T> for FjallCollection<T>
where
    T: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn insert(&self, id: &str, doc: &T) -> Result<()> {
        let bytes = serde_json::to_vec(doc).context("Failed to serialize document")?;
        self.partition
            .insert(id, bytes)
            .with_context(|| format!("Failed to write document: {id}"))?;
        debug!("Store PUT {}", id);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        match self.partition.get(id)? {
            Some(bytes) => {
                let doc = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt document: {id}"))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let existed = self.partition.get(id)?.is_some();
        if existed {
            self.partition
                .remove(id)
                .with_context(|| format!("Failed to remove document: {id}"))?;
            debug!("Store REMOVE {}", id);
        }
        Ok(existed)
    }

    async fn list(&self) -> Result<Vec<T>> {
        let mut docs = Vec::new();
        for entry in self.partition.iter() {
            let (_, bytes) = entry.context("Failed to iterate collection")?;
            docs.push(serde_json::from_slice(&bytes).context("Corrupt document in collection")?);
        }
        Ok(docs)
    }
}
