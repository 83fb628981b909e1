use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::storage::error::StorageError;
use crate::storage::traits::{Entity, EntityStorage};

/// Vector-backed repository for a single record kind
#[derive(Clone)]
pub struct MemoryRepository<T: Entity> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStorage<T> for MemoryRepository<T> {
    async fn store(&self, record: &T) -> Result<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(StorageError::DuplicateId {
                kind: T::KIND,
                id: record.id().to_string(),
            }
            .into());
        }
        debug!("Storing {} {}", T::KIND, record.id());
        records.push(record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.clone())
    }

    async fn update(&self, record: &T) -> Result<()> {
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id() == record.id())
            .ok_or_else(|| StorageError::NotFound {
                kind: T::KIND,
                id: record.id().to_string(),
            })?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id() != id);
        Ok(records.len() < before)
    }
}
