//! Runtime facts shown on the status page.

use chrono::Local;

use crate::config::DisplaySettings;

/// Web framework the status page is served by.
pub const FRAMEWORK_VERSION: &str = "axum 0.7";

/// Timestamp format for the page, e.g. `2024-03-05 16:07:09.123456`.
pub const PAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Snapshot of display strings and runtime details, taken per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFacts {
    /// Application name.
    pub name: String,
    /// Platform label.
    pub platform: String,
    /// Infrastructure version.
    pub infra_version: String,
    /// Web framework version.
    pub framework_version: String,
    /// Service and toolchain version.
    pub runtime_version: String,
    /// Local time of the request.
    pub time: String,
}

impl EnvironmentFacts {
    /// Capture facts for the current request.
    pub fn capture(settings: DisplaySettings) -> Self {
        Self {
            name: settings.app_name,
            platform: settings.container_service,
            infra_version: settings.infra_version,
            framework_version: FRAMEWORK_VERSION.to_string(),
            runtime_version: runtime_version(),
            time: Local::now().format(PAGE_TIME_FORMAT).to_string(),
        }
    }
}

/// Crate version and the minimum Rust toolchain it was built for.
pub fn runtime_version() -> String {
    format!(
        "{} {} (rust {}+)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION")
    )
}
