//! Sample services for container deployments.
//!
//! Two small HTTP services ship in this crate:
//!
//! - **backend**: a JSON API with a health check, an item count and a
//!   logging endpoint that appends one item per call to a DynamoDB table.
//! - **frontend**: an HTML status page showing configuration and runtime
//!   facts, optionally checking a peer service.
//!
//! ```text
//! GET /         -> {"Health": "Good"}
//! GET /items    -> {"count": 3}   or {"error": "fail to scan"}
//! GET /logging  -> 200, writes {id: <uuid>, time: "2024-03-05 04:07:09 PM"}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Item store trait, DynamoDB and in-memory implementations
//! - [`api`]: JSON API for the backend
//! - [`status`]: HTML status page for the frontend
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod status;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
