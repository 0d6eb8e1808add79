//! Item store backing the API service.
//!
//! This module handles:
//! - The [`ItemStore`] trait the HTTP handlers depend on
//! - A DynamoDB implementation
//! - An in-memory implementation for tests and local runs

pub mod dynamo;
pub mod item;
pub mod memory;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::StoreError;

pub use dynamo::DynamoStore;
pub use item::Item;
pub use memory::{InMemoryStore, MemoryStoreConfig};

/// A single key-value table that can be counted and appended to.
///
/// Implementations are shared across request handlers and must be safe for
/// concurrent use.
#[async_trait]
pub trait ItemStore: Send + Sync + std::fmt::Debug {
    /// Name of the table this store writes to.
    fn table_name(&self) -> &str;

    /// Count the items in the table with a full scan.
    async fn count_all(&self) -> Result<u64, StoreError>;

    /// Write one item. Every call appends a new record.
    async fn put_item(&self, item: &Item) -> Result<(), StoreError>;

    /// Check that the table answers, using only calls the service makes
    /// while serving.
    async fn check(&self) -> Result<(), StoreError> {
        self.count_all().await.map(|_| ())
    }
}

/// Run the store check once at startup.
///
/// A failing check is logged and the service keeps running, so `/` stays
/// healthy and `/items` reports the failure. With `fail_fast` the error is
/// returned instead.
pub async fn startup_check(store: &dyn ItemStore, fail_fast: bool) -> Result<(), StoreError> {
    match store.check().await {
        Ok(()) => {
            info!(table = store.table_name(), "Item store reachable");
            Ok(())
        }
        Err(e) if fail_fast => {
            error!(kind = %e.kind, error = %e, "Item store unavailable, aborting startup");
            Err(e)
        }
        Err(e) => {
            warn!(
                kind = %e.kind,
                error = %e,
                "Item store unavailable, serving anyway"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorKind;

    #[tokio::test]
    async fn failed_check_is_tolerated_by_default() {
        let store = InMemoryStore::new("no-table");
        store.set_unavailable(true);

        assert!(startup_check(&store, false).await.is_ok());
    }

    #[tokio::test]
    async fn failed_check_aborts_when_fail_fast() {
        let store = InMemoryStore::new("no-table");
        store.set_unavailable(true);

        let err = startup_check(&store, true).await.unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn healthy_store_passes_check() {
        let store = InMemoryStore::new("test-table");
        assert!(startup_check(&store, true).await.is_ok());
    }
}
