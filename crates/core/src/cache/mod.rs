//! In-memory cache index with TTL-based expiry.
//!
//! This module provides the metadata side of the cache:
//!
//! - Content-addressed ids derived from the source URL (SHA-256)
//! - A cache index mapping content id to entry metadata
//! - An insertion-ordered expiry queue enabling amortized O(expired) sweeps
//! - A background sweeper that evicts entries older than the TTL
//!
//! Payload bytes live in the blob store (`crate::blob`), joined to the
//! index by content id.

pub mod hash;
pub mod index;
pub mod sweeper;

pub use index::{CacheEntry, CacheIndex};
pub use sweeper::Sweeper;
