//! Integration tests for the item API.
//!
//! The in-memory tests run by default. The DynamoDB tests require a running
//! DynamoDB Local and an existing table:
//!
//! ```text
//! DDB_ENDPOINT_URL=http://localhost:8000 DDB_TABLE=test-table \
//!     cargo test --test integration -- --ignored
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDateTime;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use ecs_sample::api::{create_router, AppState};
use ecs_sample::config::Config;
use ecs_sample::error::StoreErrorKind;
use ecs_sample::store::{self, DynamoStore, InMemoryStore, Item, ItemStore};

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

/// DynamoDB client pointed at a port nothing listens on.
fn unreachable_dynamo(table: &str) -> DynamoStore {
    use aws_sdk_dynamodb::config::retry::RetryConfig;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};

    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("test", "test", None, None, "static"))
        .endpoint_url("http://127.0.0.1:1")
        .retry_config(RetryConfig::disabled())
        .build();
    DynamoStore::from_client(aws_sdk_dynamodb::Client::from_conf(config), table)
}

/// Get a DynamoDB Local config from environment.
fn dynamo_config() -> Option<Config> {
    dotenvy::dotenv().ok();

    let config = Config::load().ok()?;
    config.ddb_endpoint_url.as_ref()?;
    Some(config)
}

#[tokio::test]
async fn end_to_end_against_empty_store() {
    let store = InMemoryStore::new("test-table");
    let app = create_router(AppState::new(Arc::new(store.clone())));

    assert_eq!(get_json(&app, "/").await, json!({"Health": "Good"}));
    assert_eq!(get_json(&app, "/items").await, json!({"count": 0}));

    let (status, body) = get(&app, "/logging").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    assert_eq!(get_json(&app, "/items").await, json!({"count": 1}));
}

#[tokio::test]
async fn repeated_logging_writes_distinct_items() {
    let store = InMemoryStore::new("test-table");
    let app = create_router(AppState::new(Arc::new(store.clone())));

    for _ in 0..5 {
        let (status, _) = get(&app, "/logging").await;
        assert_eq!(status, StatusCode::OK);
    }

    let items = store.items();
    assert_eq!(items.len(), 5);

    let ids: HashSet<_> = items.iter().map(|item| item.id).collect();
    assert_eq!(ids.len(), 5);

    for item in &items {
        assert_eq!(item.id.get_version_num(), 4);
        assert!(
            NaiveDateTime::parse_from_str(&item.time, Item::TIME_FORMAT).is_ok(),
            "unexpected timestamp {}",
            item.time
        );
    }

    assert_eq!(get_json(&app, "/items").await, json!({"count": 5}));
}

#[tokio::test]
async fn store_outage_is_reported_then_recovers() {
    let store = InMemoryStore::new("test-table");
    let app = create_router(AppState::new(Arc::new(store.clone())));

    store.set_unavailable(true);
    assert_eq!(
        get_json(&app, "/items").await,
        json!({"error": "fail to scan"})
    );

    let (status, _) = get(&app, "/logging").await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.is_empty());

    store.set_unavailable(false);
    assert_eq!(get_json(&app, "/items").await, json!({"count": 0}));
}

#[tokio::test]
async fn unreachable_dynamo_at_startup_still_serves() {
    let store = unreachable_dynamo("no-table");
    store::startup_check(&store, false).await.unwrap();

    let app = create_router(AppState::new(Arc::new(store)));

    assert_eq!(get_json(&app, "/").await, json!({"Health": "Good"}));
    assert_eq!(
        get_json(&app, "/items").await,
        json!({"error": "fail to scan"})
    );

    let (status, body) = get(&app, "/logging").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn dynamo_logging_increments_count() {
    let Some(config) = dynamo_config() else {
        println!("Skipping: DDB_ENDPOINT_URL not set");
        return;
    };

    let store =
        DynamoStore::connect(&config.ddb_table, config.ddb_endpoint_url.as_deref()).await;
    store.check().await.expect("table should exist");
    let before = store.count_all().await.unwrap();

    let app = create_router(AppState::new(Arc::new(store.clone())));
    let (status, _) = get(&app, "/logging").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(store.count_all().await.unwrap(), before + 1);
}

#[tokio::test]
#[ignore = "requires DynamoDB Local"]
async fn dynamo_missing_table_is_not_found() {
    let Some(config) = dynamo_config() else {
        println!("Skipping: DDB_ENDPOINT_URL not set");
        return;
    };

    let store = DynamoStore::connect("no-such-table", config.ddb_endpoint_url.as_deref()).await;
    let err = store::startup_check(&store, true).await.unwrap_err();

    assert_eq!(err.kind, StoreErrorKind::NotFound);
    assert_eq!(err.operation, "scan");
}
