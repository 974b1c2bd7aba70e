//! In-memory blob store.
//!
//! Keeps payloads in process memory like the metadata index. Used by tests
//! and available as an ephemeral backend where durability does not matter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::BlobStore;
use crate::Error;

#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, id: &str) -> bool {
        let blobs = self.blobs.read().await;
        blobs.contains_key(id)
    }

    async fn write(&self, id: &str, bytes: &[u8]) -> Result<(), Error> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Vec<u8>, Error> {
        let blobs = self.blobs.read().await;
        blobs
            .get(id)
            .cloned()
            .ok_or_else(|| Error::CacheInconsistency(format!("blob {id} missing")))
    }

    async fn remove(&self, id: &str) -> Result<(), Error> {
        let mut blobs = self.blobs.write().await;
        blobs.remove(id);
        Ok(())
    }
}
