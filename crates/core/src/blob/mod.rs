//! Blob storage keyed by content id.
//!
//! The blob store holds raw fetched payloads; the cache index holds only
//! metadata. Entries are published to the index strictly after the blob
//! write succeeds, so a missing blob for an indexed id is an inconsistency
//! the gateway detects and heals at lookup time.

use async_trait::async_trait;

use crate::Error;

pub mod fs;
pub mod mem;

pub use fs::FsBlobStore;
pub use mem::MemoryBlobStore;

/// Storage for fetched payloads, keyed by content id.
///
/// Writes for the same id may overlap under racing fetches of one URL;
/// implementations must never expose a torn payload to readers.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether a payload exists for the given id.
    async fn exists(&self, id: &str) -> bool;

    /// Store a payload under the given id, replacing any previous one.
    async fn write(&self, id: &str, bytes: &[u8]) -> Result<(), Error>;

    /// Read the payload for the given id.
    async fn read(&self, id: &str) -> Result<Vec<u8>, Error>;

    /// Delete the payload for the given id. Deleting an absent id is not
    /// an error.
    async fn remove(&self, id: &str) -> Result<(), Error>;
}
