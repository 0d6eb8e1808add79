//! HTTP API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::metrics;
use crate::store::{Item, ItemStore};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Item store, built once at startup.
    pub store: Arc<dyn ItemStore>,
    /// Prometheus handle for `/metrics`, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "Good".
    #[serde(rename = "Health")]
    pub health: String,
}

/// Item count response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ItemsResponse {
    /// Scan succeeded.
    Count {
        /// Number of items in the table.
        count: u64,
    },
    /// Scan failed.
    Error {
        /// Always "fail to scan".
        error: String,
    },
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn root() -> Json<HealthResponse> {
    info!(route = "/", "Handling health check");
    metrics::inc_http_requests("/");

    Json(HealthResponse {
        health: "Good".to_string(),
    })
}

/// Item count handler.
///
/// A failed scan still answers 200, with an `error` body.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses((status = 200, description = "Item count or scan failure", body = ItemsResponse))
)]
pub async fn items(State(state): State<AppState>) -> Json<ItemsResponse> {
    info!(route = "/items", "Counting items");
    metrics::inc_http_requests("/items");

    match state.store.count_all().await {
        Ok(count) => {
            info!(table = state.store.table_name(), count, "Counted items");
            Json(ItemsResponse::Count { count })
        }
        Err(e) => {
            error!(kind = %e.kind, error = %e, "Item count failed");
            Json(ItemsResponse::Error {
                error: "fail to scan".to_string(),
            })
        }
    }
}

/// Logging handler - writes one item stamped with the current time.
///
/// Write failures are logged and the response stays an empty 200.
#[utoipa::path(
    get,
    path = "/logging",
    tag = "items",
    responses((status = 200, description = "Item write attempted, empty body"))
)]
pub async fn logging(State(state): State<AppState>) -> StatusCode {
    info!(route = "/logging", "Writing log item");
    metrics::inc_http_requests("/logging");

    let item = Item::log_entry();
    match state.store.put_item(&item).await {
        Ok(()) => info!(id = %item.id, time = %item.time, "Log item written"),
        Err(e) => error!(id = %item.id, kind = %e.kind, error = %e, "Log item write failed"),
    }

    StatusCode::OK
}

/// Prometheus exposition handler.
pub async fn metrics_text(State(state): State<AppState>) -> Response {
    metrics::exposition(state.metrics.as_ref())
}
