//! In-memory item store.
//!
//! Used by the test suite and by `backend --memory-store` for running the
//! API without AWS credentials.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreErrorKind};
use crate::metrics;

use super::{Item, ItemStore};

/// Fault injection switches for the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreConfig {
    /// Fail every scan.
    pub fail_count: bool,
    /// Fail every write.
    pub fail_put: bool,
}

/// Item store held in process memory.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    table_name: String,
    config: MemoryStoreConfig,
    items: Arc<DashMap<Uuid, Item>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_config(table_name, MemoryStoreConfig::default())
    }

    /// Create an empty store with fault injection.
    pub fn with_config(table_name: impl Into<String>, config: MemoryStoreConfig) -> Self {
        Self {
            table_name: table_name.into(),
            config,
            items: Arc::new(DashMap::new()),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the stored items.
    pub fn items(&self) -> Vec<Item> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Number of stored items, ignoring fault injection.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn simulate(&self, operation: &'static str, fail: bool) -> Result<(), StoreError> {
        let kind = if self.unavailable.load(Ordering::SeqCst) {
            StoreErrorKind::Unavailable
        } else if fail {
            StoreErrorKind::Unknown
        } else {
            return Ok(());
        };

        metrics::inc_store_errors(operation, kind.as_ref());
        Err(StoreError::new(
            kind,
            operation,
            &self.table_name,
            "injected failure",
        ))
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        self.simulate("scan", self.config.fail_count)?;
        let count = self.items.len() as u64;
        debug!(table = %self.table_name, count, "Counted in-memory items");
        Ok(count)
    }

    async fn put_item(&self, item: &Item) -> Result<(), StoreError> {
        self.simulate("put_item", self.config.fail_put)?;
        self.items.insert(item.id, item.clone());
        metrics::inc_items_written();
        debug!(table = %self.table_name, id = %item.id, "Stored in-memory item");
        Ok(())
    }
}
