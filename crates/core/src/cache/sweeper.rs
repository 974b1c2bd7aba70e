//! Background eviction of expired cache entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::CacheIndex;
use crate::blob::BlobStore;

/// Long-lived eviction loop.
///
/// Exactly one sweeper is spawned per process, at startup. Each pass
/// drains expired entries from the head of the expiry queue and removes
/// their blobs best-effort; a blob deletion failure is logged and skipped,
/// never surfaced to any caller.
pub struct Sweeper {
    index: CacheIndex,
    blobs: Arc<dyn BlobStore>,
    ttl: Duration,
    interval: Duration,
}

impl Sweeper {
    pub fn new(index: CacheIndex, blobs: Arc<dyn BlobStore>, ttl: Duration, interval: Duration) -> Self {
        Self { index, blobs, ttl, interval }
    }

    /// Spawn the sweep loop on a fixed tick.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick fires immediately; skip it so a freshly
            // started process does not sweep an empty index.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sweep().await;
            }
        })
    }

    /// Run one eviction pass, returning the number of evicted entries.
    pub async fn sweep(&self) -> usize {
        let evicted = self.index.evict_expired(self.ttl).await;

        for entry in &evicted {
            tracing::info!(id = %entry.id, url = %entry.source_url, "evicted expired cache entry");
            if let Err(e) = self.blobs.remove(&entry.id).await {
                tracing::warn!(id = %entry.id, error = %e, "failed to remove blob for evicted entry");
            }
        }

        if !evicted.is_empty() {
            tracing::debug!(count = evicted.len(), "sweep pass complete");
        }

        evicted.len()
    }
}
