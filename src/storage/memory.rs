use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ArtifactStore, StegoArtifact};
use crate::error::{Result, StegoError};

/// In-memory slot. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    slot: RwLock<Option<StegoArtifact>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, artifact: StegoArtifact) -> Result<()> {
        *self.slot.write().await = Some(artifact);
        Ok(())
    }

    async fn get(&self) -> Result<StegoArtifact> {
        self.slot.read().await.clone().ok_or(StegoError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_is_not_found() {
        let store = MemoryArtifactStore::new();
        assert!(matches!(store.get().await, Err(StegoError::NotFound)));
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = MemoryArtifactStore::new();
        store.put(StegoArtifact::new(vec![1, 2, 3])).await.unwrap();
        store.put(StegoArtifact::new(vec![4, 5])).await.unwrap();
        assert_eq!(store.get().await.unwrap().as_bytes(), &[4, 5]);
    }
}
