//! Request coordination: cache lookup, bounded fetching, write-then-publish.
//!
//! The gateway owns the whole lifecycle of one inbound request:
//!
//! 1. Canonicalize the URL and derive its content id
//! 2. Serve from the cache when the entry is fresh and its blob exists
//! 3. Otherwise acquire a limiter permit, run the fetch (with retries) as
//!    its own task, and block on its completion
//! 4. Persist the blob, then publish the index entry, then reply
//!
//! Concurrent misses for the identical URL are NOT deduplicated: each one
//! runs its own fetch under the shared limiter. The blob write is same-key
//! idempotent and the index insert is last-writer-wins, so the race only
//! costs duplicate network work.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use ::url::Url;
use tokio::sync::Semaphore;

pub mod retry;
pub mod url;

pub use retry::effective_retry_limit;
pub use self::url::canonicalize;

use crate::blob::BlobStore;
use crate::cache::hash::content_id;
use crate::cache::{CacheEntry, CacheIndex};
use crate::config::AppConfig;
use crate::error::Error;

/// One logical GET attempt against the network.
///
/// The retry/backoff policy wraps this trait from the outside, so an
/// implementation stays reusable independent of pooling and retry policy.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Bytes, Error>;
}

/// Successful gateway result.
#[derive(Debug, Clone, Serialize)]
pub struct Fetched {
    /// Stable content id derived from the canonical URL.
    pub id: String,
    /// The canonical source URL.
    pub source_url: String,
    /// Whether the payload was served from cache without a network call.
    pub cache_hit: bool,
}

/// Counters snapshot for observability.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// The request coordinator.
pub struct Gateway {
    index: CacheIndex,
    blobs: Arc<dyn BlobStore>,
    fetcher: Arc<dyn Fetcher>,
    limiter: Arc<Semaphore>,
    ttl: Duration,
    max_retries: u32,
    backoff: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Gateway {
    pub fn new(
        index: CacheIndex, blobs: Arc<dyn BlobStore>, fetcher: Arc<dyn Fetcher>, config: &AppConfig,
    ) -> Self {
        Self {
            index,
            blobs,
            fetcher,
            limiter: Arc::new(Semaphore::new(config.max_in_flight)),
            ttl: config.ttl(),
            max_retries: config.max_retries,
            backoff: config.backoff(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Handle one inbound request.
    ///
    /// On a miss the caller blocks for the full retry budget of the
    /// dispatched fetch unit; there is no shorter external deadline. A
    /// `retry_limit` of zero or below, or above the configured cap, falls
    /// back to the cap.
    pub async fn handle(&self, url: &str, retry_limit: i64) -> Result<Fetched, Error> {
        let url = canonicalize(url)?;
        let id = content_id(url.as_str());

        if let Some(entry) = self.index.fresh(&id, self.ttl).await {
            // A hit requires the payload too, not just the metadata.
            if self.blobs.exists(&id).await {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(url = %url, id = %id, "cache hit");
                return Ok(Fetched { id, source_url: entry.source_url, cache_hit: true });
            }
            tracing::warn!(url = %url, id = %id, "cache entry without blob, treating as miss");
            self.index.remove(&id).await;
        } else if let Some(entry) = self.index.get(&id).await {
            tracing::debug!(url = %url, id = %id, age = ?entry.age(), "cache entry expired at lookup");
            self.index.remove(&id).await;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        let attempts = effective_retry_limit(retry_limit, self.max_retries);
        let body = self.dispatch_fetch(url.clone(), attempts).await?;

        // Write the blob fully before advertising it in the index, so no
        // reader can observe an entry whose payload is not yet durable.
        self.blobs.write(&id, &body).await?;
        self.index.insert(CacheEntry::new(id.clone(), url.as_str())).await;

        tracing::info!(url = %url, id = %id, bytes = body.len(), attempts, "fetched and cached");

        Ok(Fetched { id, source_url: url.to_string(), cache_hit: false })
    }

    /// Run the retry loop as its own unit of work and await its outcome.
    ///
    /// The limiter permit is acquired before the task is spawned and rides
    /// inside it, so it is held for the whole network interaction and
    /// released on completion, success or failure.
    async fn dispatch_fetch(&self, url: Url, attempts: u32) -> Result<Bytes, Error> {
        let permit = self
            .limiter
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| Error::Internal(format!("limiter closed: {e}")))?;

        let fetcher = self.fetcher.clone();
        let backoff = self.backoff;
        let job = tokio::spawn(async move {
            let _permit = permit;
            retry::fetch_with_retry(fetcher.as_ref(), &url, attempts, backoff).await
        });

        job.await
            .map_err(|e| Error::Internal(format!("fetch task failed: {e}")))?
    }

    /// Current index size and hit/miss counters.
    pub async fn stats(&self) -> GatewayStats {
        GatewayStats {
            entries: self.index.len().await,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
