//! Cache index and expiry queue.
//!
//! The index maps content ids to entry metadata; the expiry queue records
//! ids in insertion order so the sweeper can stop at the first fresh head
//! instead of scanning the whole index. Both structures live behind one
//! lock and are only ever mutated together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Metadata for one cached fetch result.
///
/// No entry exists without a corresponding blob having been written first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: String,
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self { id: id.into(), source_url: source_url.into(), fetched_at: Utc::now() }
    }

    /// Age of the entry relative to now.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.fetched_at).to_std().unwrap_or_default()
    }

    /// Whether the entry is still within the freshness window.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    expiry: VecDeque<String>,
}

/// Shared cache index handle.
///
/// Cloning is cheap; all clones observe the same index. Every operation
/// takes the lock once, so a lookup or an insert is atomic with respect to
/// concurrent request handlers and the sweeper.
#[derive(Debug, Clone, Default)]
pub struct CacheIndex {
    inner: Arc<RwLock<Inner>>,
}

impl CacheIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry by content id.
    pub async fn get(&self, id: &str) -> Option<CacheEntry> {
        let inner = self.inner.read().await;
        inner.entries.get(id).cloned()
    }

    /// Look up an entry and return it only if it is still fresh.
    pub async fn fresh(&self, id: &str, ttl: Duration) -> Option<CacheEntry> {
        let inner = self.inner.read().await;
        inner.entries.get(id).filter(|e| e.is_fresh(ttl)).cloned()
    }

    /// Insert or refresh an entry.
    ///
    /// The id is re-appended to the expiry queue even when the entry
    /// already exists; the sweeper skips queue references whose entry is
    /// gone or newer than the TTL cutoff, so duplicates are harmless.
    /// Concurrent inserts for the same id are last-writer-wins.
    pub async fn insert(&self, entry: CacheEntry) {
        let mut inner = self.inner.write().await;
        inner.expiry.push_back(entry.id.clone());
        inner.entries.insert(entry.id.clone(), entry);
    }

    /// Remove an entry by content id. Its expiry queue references are left
    /// behind and popped as no-ops by the sweeper.
    pub async fn remove(&self, id: &str) -> Option<CacheEntry> {
        let mut inner = self.inner.write().await;
        inner.entries.remove(id)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let inner = self.inner.read().await;
        inner.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of all live entries, in no particular order.
    pub async fn entries(&self) -> Vec<CacheEntry> {
        let inner = self.inner.read().await;
        inner.entries.values().cloned().collect()
    }

    /// Evict every entry older than `ttl`, returning the removed entries.
    ///
    /// Walks the expiry queue from the head: a reference to a missing
    /// entry is popped and skipped, an expired entry is popped and
    /// removed, and the pass stops at the first fresh head (insertion
    /// order approximates age order, so nothing behind it is older).
    pub async fn evict_expired(&self, ttl: Duration) -> Vec<CacheEntry> {
        let mut inner = self.inner.write().await;
        let mut evicted = Vec::new();

        loop {
            let Some(id) = inner.expiry.front().cloned() else {
                break;
            };

            match inner.entries.get(&id).map(|e| e.is_fresh(ttl)) {
                // Stale reference: entry was removed or re-fetched earlier.
                None => {
                    inner.expiry.pop_front();
                }
                Some(false) => {
                    inner.expiry.pop_front();
                    if let Some(entry) = inner.entries.remove(&id) {
                        evicted.push(entry);
                    }
                }
                Some(true) => break,
            }
        }

        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::hash::content_id;

    fn entry_aged(url: &str, age_secs: i64) -> CacheEntry {
        CacheEntry {
            id: content_id(url),
            source_url: url.to_string(),
            fetched_at: Utc::now() - chrono::Duration::seconds(age_secs),
        }
    }

    const TTL: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_insert_and_get() {
        let index = CacheIndex::new();
        let entry = CacheEntry::new(content_id("http://example.test/a"), "http://example.test/a");
        index.insert(entry.clone()).await;

        let found = index.get(&entry.id).await.unwrap();
        assert_eq!(found.source_url, "http://example.test/a");
        assert_eq!(index.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let index = CacheIndex::new();
        assert!(index.get("nonexistent").await.is_none());
    }

    #[tokio::test]
    async fn test_fresh_respects_ttl() {
        let index = CacheIndex::new();
        let live = entry_aged("http://example.test/live", 1);
        let stale = entry_aged("http://example.test/stale", 10);
        index.insert(live.clone()).await;
        index.insert(stale.clone()).await;

        assert!(index.fresh(&live.id, TTL).await.is_some());
        assert!(index.fresh(&stale.id, TTL).await.is_none());
        // A stale entry is still present until someone removes it.
        assert!(index.get(&stale.id).await.is_some());
    }

    #[tokio::test]
    async fn test_remove() {
        let index = CacheIndex::new();
        let entry = entry_aged("http://example.test/a", 0);
        index.insert(entry.clone()).await;

        assert!(index.remove(&entry.id).await.is_some());
        assert!(index.remove(&entry.id).await.is_none());
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn test_evict_expired_only_old_entries() {
        let index = CacheIndex::new();
        index.insert(entry_aged("http://example.test/t1", 6)).await;
        index.insert(entry_aged("http://example.test/t2", 3)).await;
        index.insert(entry_aged("http://example.test/t3", 1)).await;

        let evicted = index.evict_expired(TTL).await;
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].source_url, "http://example.test/t1");

        assert!(index.get(&content_id("http://example.test/t1")).await.is_none());
        assert_eq!(index.len().await, 2);
    }

    #[tokio::test]
    async fn test_evict_expired_stops_at_fresh_head() {
        let index = CacheIndex::new();
        index.insert(entry_aged("http://example.test/a", 1)).await;
        index.insert(entry_aged("http://example.test/b", 10)).await;

        // The fresh head shields the queue even though a later entry is
        // old; the next pass after the head expires will reach it.
        let evicted = index.evict_expired(TTL).await;
        assert!(evicted.is_empty());
        assert_eq!(index.len().await, 2);
    }

    #[tokio::test]
    async fn test_evict_skips_removed_ids() {
        let index = CacheIndex::new();
        let entry = entry_aged("http://example.test/a", 10);
        index.insert(entry.clone()).await;
        index.remove(&entry.id).await;

        // The queue still references the removed id; popping it is a no-op.
        let evicted = index.evict_expired(TTL).await;
        assert!(evicted.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_reappends_to_queue() {
        let index = CacheIndex::new();
        index.insert(entry_aged("http://example.test/a", 10)).await;
        // Re-fetch of the same URL replaces the entry and re-appends the id.
        index.insert(entry_aged("http://example.test/a", 0)).await;

        let evicted = index.evict_expired(TTL).await;
        assert!(evicted.is_empty());
        assert_eq!(index.len().await, 1);

        // The refreshed entry won, not the back-dated one.
        let entry = index.get(&content_id("http://example.test/a")).await.unwrap();
        assert!(entry.is_fresh(TTL));
    }

    #[tokio::test]
    async fn test_entries_snapshot() {
        let index = CacheIndex::new();
        index.insert(entry_aged("http://example.test/a", 0)).await;
        index.insert(entry_aged("http://example.test/b", 0)).await;

        let all = index.entries().await;
        assert_eq!(all.len(), 2);
    }
}
