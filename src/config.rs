//! Service configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Persistence ===
    /// DynamoDB table backing the item API.
    #[serde(default = "default_table")]
    pub ddb_table: String,

    /// Endpoint override, e.g. DynamoDB Local at `http://localhost:8000`.
    #[serde(default)]
    pub ddb_endpoint_url: Option<String>,

    // === Server ===
    /// Listen port, read once at startup.
    #[serde(default = "default_port")]
    pub port_in: u16,

    // === Status page display ===
    /// Application name shown on the status page.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Platform label shown on the status page.
    #[serde(default = "default_container_service")]
    pub container_service: String,

    /// Infrastructure version shown on the status page.
    #[serde(default = "default_infra_version")]
    pub infra_version: String,

    // === Peer service ===
    /// Peer fetched on every status page render. Unset disables the call.
    #[serde(default)]
    pub peer_url: Option<String>,

    /// Timeout for the peer call in milliseconds.
    #[serde(default = "default_peer_timeout_ms")]
    pub peer_timeout_ms: u64,
}

/// Display strings for the status page.
///
/// Read separately from [`Config`] so the page reflects the environment at
/// request time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplaySettings {
    /// Application name.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Platform label.
    #[serde(default = "default_container_service")]
    pub container_service: String,

    /// Infrastructure version.
    #[serde(default = "default_infra_version")]
    pub infra_version: String,
}

fn default_table() -> String {
    "no-table".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_app_name() -> String {
    "AWS ECS Flask Webpage".to_string()
}

fn default_container_service() -> String {
    "AWS".to_string()
}

fn default_infra_version() -> String {
    "0.0.0".to_string()
}

fn default_peer_timeout_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ddb_table.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "DDB_TABLE",
                reason: "must not be empty".to_string(),
            });
        }

        if self.port_in == 0 {
            return Err(ConfigError::Invalid {
                field: "PORT_IN",
                reason: "must be between 1 and 65535".to_string(),
            });
        }

        if self.peer_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "PEER_TIMEOUT_MS",
                reason: "must be greater than zero".to_string(),
            });
        }

        self.peer_url()?;
        Ok(())
    }

    /// Parsed peer URL, if one is configured.
    pub fn peer_url(&self) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.peer_url.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };

        let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
            field: "PEER_URL",
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Some(url)),
            other => Err(ConfigError::Invalid {
                field: "PEER_URL",
                reason: format!("unsupported scheme {other}"),
            }),
        }
    }

    /// Peer call timeout.
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }
}

impl DisplaySettings {
    /// Read the display strings from the current process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Read the display strings from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            container_service: default_container_service(),
            infra_version: default_infra_version(),
        }
    }
}
