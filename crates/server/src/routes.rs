//! HTTP surface: wire types, handlers, router.
//!
//! Field names follow the JSON wire format (`retryLimit`, `sourceUrl`).

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use pagevault_core::gateway::GatewayStats;
use pagevault_core::{BlobStore, Gateway};

use crate::error::ApiError;

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub blobs: Arc<dyn BlobStore>,
}

/// Decoded inbound fetch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,

    /// Retry attempts for this request; 0 (the default when omitted) and
    /// out-of-range values fall back to the configured cap.
    #[serde(default, rename = "retryLimit")]
    pub retry_limit: i64,
}

/// Successful fetch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub id: String,

    #[serde(rename = "sourceUrl")]
    pub source_url: String,

    /// Whether the result was served from cache without a network call.
    pub cached: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/pagesource", post(fetch_page))
        .route("/blobs/{id}", get(read_blob))
        .route("/stats", get(stats))
        .route("/health", get(health))
        .with_state(state)
}

async fn fetch_page(
    State(state): State<AppState>, Json(req): Json<FetchRequest>,
) -> Result<Json<FetchResponse>, ApiError> {
    let fetched = state.gateway.handle(&req.url, req.retry_limit).await?;
    Ok(Json(FetchResponse { id: fetched.id, source_url: fetched.source_url, cached: fetched.cache_hit }))
}

async fn read_blob(State(state): State<AppState>, Path(id): Path<String>) -> Result<Vec<u8>, ApiError> {
    Ok(state.blobs.read(&id).await?)
}

async fn stats(State(state): State<AppState>) -> Json<GatewayStats> {
    Json(state.gateway.stats().await)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
