//! Network client for pagevault.
//!
//! This crate provides the reqwest-backed implementation of the core's
//! `Fetcher` trait: one logical GET attempt per call, with the retry and
//! pooling policy applied by the gateway on the outside.

pub mod http;

pub use http::{FetchConfig, HttpFetcher};
