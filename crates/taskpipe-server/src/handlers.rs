//! HTTP request handlers for the taskpipe service.
//!
//! Implements the list-fetch endpoint and a health check using axum.

use crate::config::AppConfig;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router as AxumRouter,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use taskpipe_cache::Cache;
use taskpipe_client::{attach_time_in_status, fetch_list_tasks, ApiError, Transport};
use taskpipe_domain::NormalizedRecord;
use taskpipe_extractor::FieldCatalog;
use taskpipe_normalizer::normalize_tasks;
use taskpipe_store::TaskStore;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Resolved output timezone
    pub timezone: Tz,

    /// The field catalog, compiled once at startup
    pub catalog: Arc<FieldCatalog>,

    /// Upstream HTTP transport
    pub transport: Arc<dyn Transport>,

    /// Redis cache, when configured and reachable at startup
    pub cache: Option<Cache>,

    /// SQLite store, when configured
    pub store: Option<Arc<Mutex<TaskStore>>>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,

    /// Whether a cache is attached
    pub cache: bool,

    /// Whether a persistence store is attached
    pub database: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The list id failed validation; nothing was fetched
    InvalidListId,
    /// The upstream fetch failed
    Upstream(ApiError),
    /// Internal error (persistence, state)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidListId => (StatusCode::BAD_REQUEST, "Invalid list ID.".to_string()),
            // An upstream client-error answer is the caller's problem;
            // everything else (5xx, exhausted retries, bad payloads) is ours.
            AppError::Upstream(ApiError::UpstreamStatus { status, message })
                if (400..500).contains(&status) =>
            {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Upstream returned HTTP {}: {}", status, message),
                )
            }
            AppError::Upstream(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Upstream(e)
    }
}

/// GET /lists/{list_id}/tasks - fetch, extract and normalize one list
///
/// Validates the id before any upstream call, serves from cache when it can,
/// and otherwise runs the full fetch → extract → normalize pipeline, caching
/// and persisting the result on the way out.
async fn get_list_tasks(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> Result<Json<Vec<NormalizedRecord>>, AppError> {
    if list_id.is_empty() || !list_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::InvalidListId);
    }

    let cache_key = format!("list:{}:tasks", list_id);
    if let Some(cache) = &state.cache {
        if let Some(records) = cache.get::<Vec<NormalizedRecord>>(&cache_key).await {
            info!(list_id = %list_id, count = records.len(), "serving list from cache");
            return Ok(Json(records));
        }
    }

    let client_config = state.config.client_config();
    let query = state.config.list_query(&list_id);

    let mut tasks =
        fetch_list_tasks(state.transport.as_ref(), &client_config, &list_id, &query).await?;

    if state.config.fetch_time_in_status {
        attach_time_in_status(state.transport.as_ref(), &client_config, &mut tasks).await?;
    }

    let generated_at = chrono::Utc::now().with_timezone(&state.timezone);
    let batch = normalize_tasks(&tasks, &state.catalog, state.timezone, generated_at);

    if let Some(cache) = &state.cache {
        cache.set(&cache_key, &batch.records).await;
    }

    if let Some(store) = &state.store {
        let records_dataset = state.config.records_dataset(&list_id);
        let status_dataset = state.config.status_history_dataset(&list_id);

        let mut guard = store
            .lock()
            .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
        guard
            .save_records(&records_dataset, &state.catalog, &batch.records)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        guard
            .save_status_history(&status_dataset, &batch.status_history)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }

    info!(list_id = %list_id, count = batch.records.len(), "list fetch served");
    Ok(Json(batch.records))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        cache: state.cache.is_some(),
        database: state.store.is_some(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/lists/:list_id/tasks", get(get_list_tasks))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Log-and-continue helper for optional cache startup.
pub(crate) async fn connect_cache_or_disable(config: &AppConfig) -> Option<Cache> {
    let section = config.cache.as_ref()?;
    let cache_config = taskpipe_cache::CacheConfig {
        url: section.url.clone(),
        ttl: std::time::Duration::from_secs(section.ttl_secs),
    };
    match Cache::connect(&cache_config).await {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!(error = %e, "cache unreachable at startup, running without cache");
            None
        }
    }
}
