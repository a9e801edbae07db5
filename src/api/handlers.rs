//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::cache::ResultCache;
use crate::error::{CrewError, Result};
use crate::hooks::{log_completion, validate_and_normalize_inputs, Inputs};
use crate::models::{
    CompletionRequest, CompletionResponse, ExpireResponse, HealthResponse, InputsResponse,
    LookupResponse, PurgeResponse, StatsResponse, StoreRequest, StoreResponse, TemplateResponse,
};
use crate::video::AnalysisTemplate;

/// Application state shared across all handlers.
///
/// The cache serializes its own writes, so a plain `Arc` is enough.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ResultCache>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: ResultCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(ResultCache::from_config(config))
    }
}

/// Runs a cache call on the blocking pool, since the file store does
/// synchronous I/O.
async fn blocking<T, F>(cache: Arc<ResultCache>, call: F) -> Result<T>
where
    F: FnOnce(&ResultCache) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&cache)).await?
}

/// Handler for GET /cache/:key
///
/// 404 on a miss (never written or expired); 500 when the record is damaged.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LookupResponse>> {
    let lookup_key = key.clone();
    match blocking(state.cache, move |cache| cache.lookup(&lookup_key)).await {
        Ok(Some(result)) => Ok(Json(LookupResponse::new(key, result))),
        Ok(None) => Err(CrewError::NotFound(key)),
        Err(e) => {
            warn!(key = %key, error = %e, "Cache lookup failed");
            Err(e)
        }
    }
}

/// Handler for PUT /cache
pub async fn store_handler(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CrewError::InvalidRequest(error_msg));
    }

    let key = req.key.clone();
    blocking(state.cache, move |cache| cache.store(&req.key, req.result)).await?;

    Ok(Json(StoreResponse::new(key)))
}

/// Handler for DELETE /cache/:key
pub async fn expire_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExpireResponse>> {
    let expire_key = key.clone();
    if blocking(state.cache, move |cache| cache.expire(&expire_key)).await? {
        Ok(Json(ExpireResponse::new(key)))
    } else {
        Err(CrewError::NotFound(key))
    }
}

/// Handler for POST /purge
pub async fn purge_handler(State(state): State<AppState>) -> Result<Json<PurgeResponse>> {
    let purged = blocking(state.cache, ResultCache::purge_expired).await?;
    Ok(Json(PurgeResponse { purged }))
}

/// Handler for POST /inputs/validate
///
/// Accepts a JSON object or `null`.
pub async fn validate_inputs_handler(
    Json(inputs): Json<Option<Inputs>>,
) -> Result<Json<InputsResponse>> {
    let inputs = validate_and_normalize_inputs(inputs.as_ref())?;
    Ok(Json(InputsResponse { inputs }))
}

/// Handler for POST /tasks/completed
pub async fn completion_handler(
    Json(req): Json<CompletionRequest>,
) -> (StatusCode, Json<CompletionResponse>) {
    log_completion(&req.task, &req.output, &req.agent);
    (
        StatusCode::ACCEPTED,
        Json(CompletionResponse {
            output_chars: req.output.chars().count(),
            task: req.task,
            agent: req.agent,
        }),
    )
}

/// Handler for GET /video/templates
pub async fn templates_handler() -> Json<Vec<TemplateResponse>> {
    Json(
        AnalysisTemplate::ALL
            .into_iter()
            .map(TemplateResponse::from)
            .collect(),
    )
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.ttl().as_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
