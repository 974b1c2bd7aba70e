//! Core types and shared functionality for pagevault.
//!
//! This crate provides:
//! - Cache index, expiry queue, and background sweeper
//! - Blob storage backends keyed by content id
//! - The request coordinator (gateway) with bounded fetch concurrency
//! - Unified error types
//! - Configuration structures

pub mod blob;
pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;

pub use blob::BlobStore;
pub use cache::{CacheEntry, CacheIndex, Sweeper};
pub use config::AppConfig;
pub use error::Error;
pub use gateway::{Fetched, Fetcher, Gateway};
