//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{self, items, logging, metrics_text, root, AppState};

/// OpenAPI document for the item API.
#[derive(OpenApi)]
#[openapi(
    info(title = "Sample backend", description = "Health, item count and logging endpoints"),
    paths(handlers::root, handlers::items, handlers::logging),
    components(schemas(handlers::HealthResponse, handlers::ItemsResponse)),
    tags(
        (name = "health", description = "Liveness"),
        (name = "items", description = "DynamoDB-backed items")
    )
)]
pub struct ApiDoc;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/items", get(items))
        .route("/logging", get(logging))
        .route("/metrics", get(metrics_text))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::store::InMemoryStore;

    fn app(store: &InMemoryStore) -> Router {
        create_router(AppState::new(Arc::new(store.clone())))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_reports_good_health() {
        let store = InMemoryStore::new("test-table");
        let (status, body) = get_json(app(&store), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"Health": "Good"}));
    }

    #[tokio::test]
    async fn items_on_empty_table_is_zero() {
        let store = InMemoryStore::new("test-table");
        let (status, body) = get_json(app(&store), "/items").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"count": 0}));
    }

    #[tokio::test]
    async fn items_on_unreachable_store_reports_error() {
        let store = InMemoryStore::new("test-table");
        store.set_unavailable(true);
        let (status, body) = get_json(app(&store), "/items").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "fail to scan"}));
    }

    #[tokio::test]
    async fn logging_returns_empty_ok_and_writes_one_item() {
        let store = InMemoryStore::new("test-table");
        let response = app(&store)
            .oneshot(Request::builder().uri("/logging").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn metrics_without_recorder_is_not_found() {
        let store = InMemoryStore::new("test-table");
        let response = app(&store)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let store = InMemoryStore::new("test-table");
        let (status, body) = get_json(app(&store), "/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/items").is_some());
        assert!(body["paths"].get("/logging").is_some());
    }
}
