//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints. Writes go through a
//! [`MemoryWriter`] exactly like proxied responses do.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{unix_time, MemoryStore, MemoryWriter};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, DeleteResponse, EntryResponse, HealthResponse, PutRequest, PutResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Memory cache tier
    pub store: Arc<MemoryStore>,
    /// TTL in seconds applied when a request carries none
    pub default_ttl: u64,
    /// Body limit applied when a request carries none, 0 = unlimited
    pub max_item_size: u64,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(store: Arc<MemoryStore>, default_ttl: u64, max_item_size: u64) -> Self {
        Self {
            store,
            default_ttl,
            max_item_size,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = MemoryStore::new(config.store_options());
        Self::new(store, config.default_ttl, config.max_item_size)
    }
}

/// Handler for PUT /cache/*key
///
/// Streams the request's header and body into a writer. An oversize body is
/// discarded and reported as 413; the key is then ignored for later writes.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<PutRequest>,
) -> Result<Json<PutResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    let expires_at = unix_time().saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX));
    let max_size = req.max_size.unwrap_or(state.max_item_size);

    let mut writer = state.store.open_writer(
        &key,
        expires_at,
        req.status.unwrap_or(200),
        req.dirty,
        max_size,
    )?;

    if let Err(e) = fill(&mut writer, &req) {
        writer.discard()?;
        return Err(e);
    }
    writer.close()?;

    Ok(Json(PutResponse::new(key, expires_at)))
}

fn fill(writer: &mut MemoryWriter, req: &PutRequest) -> Result<()> {
    writer.write_header(req.header.as_bytes())?;
    writer.write(req.body.as_bytes())?;
    Ok(())
}

/// Handler for GET /cache/*key
///
/// Returns the committed entry for a key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let entry = state
        .store
        .lookup(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(EntryResponse::new(key, &entry)))
}

/// Handler for DELETE /cache/*key
///
/// Purges a key from the cache.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.store.delete(&key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
///
/// Returns current store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let tracked = state.store.expires_list().len();
    Json(StatsResponse::new(state.store.stats(), tracked))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
