//! Unified error types for the sample services.

use std::time::Duration;

use strum::{AsRefStr, Display};
use thiserror::Error;

/// Unified error type for the sample services.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Item store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Peer service error.
    #[error("peer error: {0}")]
    Peer(#[from] PeerError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment could not be deserialized.
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// A value was read but is not acceptable.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Environment variable name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Broad classification of item store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StoreErrorKind {
    /// The table does not exist.
    NotFound,
    /// The store could not be reached.
    Unavailable,
    /// The call did not complete in time.
    Timeout,
    /// The store rejected the call for exceeding throughput limits.
    Throttled,
    /// Anything else (permissions, validation, internal errors).
    Unknown,
}

/// Item store operation error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} during {operation} on {table}: {message}")]
pub struct StoreError {
    /// Error classification.
    pub kind: StoreErrorKind,
    /// Store operation that failed (e.g. "scan").
    pub operation: &'static str,
    /// Table the operation targeted.
    pub table: String,
    /// Underlying error message.
    pub message: String,
}

impl StoreError {
    /// Create a new store error.
    pub fn new(
        kind: StoreErrorKind,
        operation: &'static str,
        table: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            operation,
            table: table.into(),
            message: message.into(),
        }
    }
}

/// Outbound peer request errors.
#[derive(Error, Debug)]
pub enum PeerError {
    /// Request did not complete within the configured timeout.
    #[error("peer request timed out after {0:?}")]
    Timeout(Duration),

    /// Could not connect to the peer.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// Peer answered with a non-success status.
    #[error("peer returned status {0}")]
    Status(u16),

    /// Any other request failure.
    #[error("peer request failed: {0}")]
    Request(String),
}

impl PeerError {
    /// Short label used in logs, metrics and the status page.
    pub fn kind(&self) -> &'static str {
        match self {
            PeerError::Timeout(_) => "timeout",
            PeerError::Unreachable(_) => "unavailable",
            PeerError::Status(_) => "bad_status",
            PeerError::Request(_) => "unknown",
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_kind_labels_are_snake_case() {
        assert_eq!(StoreErrorKind::NotFound.as_ref(), "not_found");
        assert_eq!(StoreErrorKind::Throttled.to_string(), "throttled");
    }

    #[test]
    fn store_error_message_names_operation_and_table() {
        let err = StoreError::new(StoreErrorKind::Unavailable, "scan", "orders", "connection refused");
        assert_eq!(
            err.to_string(),
            "unavailable during scan on orders: connection refused"
        );
    }

    #[test]
    fn peer_error_kinds() {
        assert_eq!(PeerError::Timeout(Duration::from_secs(1)).kind(), "timeout");
        assert_eq!(PeerError::Status(502).kind(), "bad_status");
    }
}
