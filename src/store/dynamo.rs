//! DynamoDB item store.
//!
//! Table schema:
//! - `id`: item identifier (String, UUID)
//! - `time`: write time (String, `%Y-%m-%d %I:%M:%S %p`)
//!
//! Any extra item attributes are written as String attributes. The service
//! only needs `dynamodb:Scan` and `dynamodb:PutItem`.

use async_trait::async_trait;
use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{StoreError, StoreErrorKind};
use crate::metrics;

use super::{Item, ItemStore};

/// DynamoDB implementation of [`ItemStore`].
#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    /// Build a DynamoDB client for `table_name`.
    ///
    /// Credentials and region come from the standard AWS provider chain.
    /// `endpoint_url` overrides the service endpoint (DynamoDB Local). No call
    /// is made here; use [`ItemStore::check`] to probe the table.
    #[instrument(skip(table_name))]
    pub async fn connect(table_name: impl Into<String>, endpoint_url: Option<&str>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let client = if let Some(endpoint) = endpoint_url {
            let dynamo_config = aws_sdk_dynamodb::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .build();
            Client::from_conf(dynamo_config)
        } else {
            Client::new(&config)
        };

        let store = Self::from_client(client, table_name);
        info!(table = %store.table_name, "DynamoDB client ready");
        store
    }

    /// Wrap an already configured client without contacting DynamoDB.
    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn failure<E>(&self, operation: &'static str, err: SdkError<E, HttpResponse>) -> StoreError
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let kind = classify(&err);
        let message = DisplayErrorContext(&err).to_string();

        error!(
            table = %self.table_name,
            operation,
            kind = %kind,
            error = %message,
            "DynamoDB call failed"
        );
        metrics::inc_store_errors(operation, kind.as_ref());

        StoreError::new(kind, operation, &self.table_name, message)
    }
}

/// Map an SDK error onto the store error taxonomy.
pub fn classify<E, R>(err: &SdkError<E, R>) -> StoreErrorKind
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::TimeoutError(_) => StoreErrorKind::Timeout,
        SdkError::DispatchFailure(failure) if failure.is_timeout() => StoreErrorKind::Timeout,
        SdkError::DispatchFailure(_) => StoreErrorKind::Unavailable,
        SdkError::ServiceError(context) => classify_code(context.err().code()),
        _ => StoreErrorKind::Unknown,
    }
}

fn classify_code(code: Option<&str>) -> StoreErrorKind {
    match code {
        Some("ResourceNotFoundException") => StoreErrorKind::NotFound,
        Some(
            "ProvisionedThroughputExceededException"
            | "RequestLimitExceeded"
            | "ThrottlingException",
        ) => StoreErrorKind::Throttled,
        Some("ServiceUnavailable" | "InternalServerError") => StoreErrorKind::Unavailable,
        _ => StoreErrorKind::Unknown,
    }
}

#[async_trait]
impl ItemStore for DynamoStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    // Single page only: tables past 1 MB of scanned data are undercounted.
    async fn count_all(&self) -> Result<u64, StoreError> {
        let _timer = metrics::timer_store("scan");

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .select(Select::Count)
            .send()
            .await
            .map_err(|e| self.failure("scan", e))?;

        let count = u64::try_from(output.count()).unwrap_or_default();

        if output.last_evaluated_key().is_some() {
            warn!(
                table = %self.table_name,
                count,
                "Scan stopped at page boundary, count covers the first page only"
            );
        }

        debug!(
            table = %self.table_name,
            count,
            scanned = output.scanned_count(),
            "Scanned DynamoDB table"
        );

        Ok(count)
    }

    async fn put_item(&self, item: &Item) -> Result<(), StoreError> {
        let _timer = metrics::timer_store("put_item");

        let request = item.fields().fold(
            self.client.put_item().table_name(&self.table_name),
            |request, (name, value)| request.item(name, AttributeValue::S(value)),
        );

        request
            .send()
            .await
            .map_err(|e| self.failure("put_item", e))?;

        metrics::inc_items_written();
        debug!(table = %self.table_name, id = %item.id, "Stored item in DynamoDB");

        Ok(())
    }

    // Scan and PutItem are the only actions the task role is granted.
    async fn check(&self) -> Result<(), StoreError> {
        let _timer = metrics::timer_store("scan");

        self.client
            .scan()
            .table_name(&self.table_name)
            .select(Select::Count)
            .limit(1)
            .send()
            .await
            .map_err(|e| self.failure("scan", e))?;

        Ok(())
    }
}
