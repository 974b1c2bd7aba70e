//! pagevault server entry point.
//!
//! Boots the HTTP gateway: configuration, blob store, cache index, the
//! process-scoped background sweeper, and the axum router.

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;

use pagevault_client::{FetchConfig, HttpFetcher};
use pagevault_core::blob::FsBlobStore;
use pagevault_core::{AppConfig, BlobStore, CacheIndex, Gateway, Sweeper};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load()?;

    let store = FsBlobStore::new(&config.blob_dir);
    store.init().await?;
    let blobs: Arc<dyn BlobStore> = Arc::new(store);

    let index = CacheIndex::new();
    let fetcher = Arc::new(HttpFetcher::new(FetchConfig::from(&config))?);
    let gateway = Arc::new(Gateway::new(index.clone(), blobs.clone(), fetcher, &config));

    // Exactly one sweeper for the life of the process.
    Sweeper::new(index, blobs.clone(), config.ttl(), config.sweep_interval()).spawn();

    let state = routes::AppState { gateway, blobs };
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, ttl_secs = config.ttl_secs, "pagevault listening");

    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
