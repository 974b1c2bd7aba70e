//! File-backed blob store, one file per content id.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::BlobStore;
use crate::Error;

/// Blob store writing payloads to a flat directory.
///
/// Content ids are hex strings, so they are used directly as file names.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ensure the storage directory exists.
    pub async fn init(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::PersistFailure(format!("creating {}: {e}", self.dir.display())))?;
        tracing::info!(dir = %self.dir.display(), "blob store initialized");
        Ok(())
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(id)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, id: &str) -> bool {
        fs::try_exists(self.path(id)).await.unwrap_or(false)
    }

    async fn write(&self, id: &str, bytes: &[u8]) -> Result<(), Error> {
        // Write to a temp path and rename so a concurrent reader never
        // observes a partially written payload.
        let tmp = self.dir.join(format!("{id}.tmp"));
        let path = self.path(id);

        fs::write(&tmp, bytes)
            .await
            .map_err(|e| Error::PersistFailure(format!("writing {id}: {e}")))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| Error::PersistFailure(format!("publishing {id}: {e}")))?;

        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Vec<u8>, Error> {
        match fs::read(self.path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::CacheInconsistency(format!("blob {id} missing")))
            }
            Err(e) => Err(Error::CacheInconsistency(format!("reading blob {id}: {e}"))),
        }
    }

    async fn remove(&self, id: &str) -> Result<(), Error> {
        match fs::remove_file(self.path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::PersistFailure(format!("removing blob {id}: {e}"))),
        }
    }
}
