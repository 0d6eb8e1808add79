//! Status page handlers.

use axum::{
    extract::State,
    response::{Html, Response},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

use crate::config::DisplaySettings;
use crate::metrics;

use super::facts::EnvironmentFacts;
use super::page::{self, PeerStatus};
use super::peer::PeerClient;

/// Where the display strings come from.
#[derive(Debug, Clone)]
pub enum DisplaySource {
    /// Re-read the process environment on every request.
    Environment,
    /// Use fixed values.
    Fixed(DisplaySettings),
}

impl DisplaySource {
    /// Resolve the display strings for one request.
    pub fn resolve(&self) -> DisplaySettings {
        match self {
            DisplaySource::Environment => DisplaySettings::from_env().unwrap_or_else(|e| {
                warn!(error = %e, "Could not read display settings, using defaults");
                DisplaySettings::default()
            }),
            DisplaySource::Fixed(settings) => settings.clone(),
        }
    }
}

/// Status page state shared with handlers.
#[derive(Debug, Clone)]
pub struct StatusState {
    /// Display string source.
    pub display: DisplaySource,
    /// Peer to call on each render, if configured.
    pub peer: Option<PeerClient>,
    /// Prometheus handle for `/metrics`, if a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl StatusState {
    /// Create state reading display strings from the environment.
    pub fn new(peer: Option<PeerClient>) -> Self {
        Self {
            display: DisplaySource::Environment,
            peer,
            metrics: None,
        }
    }

    /// Create state with fixed display strings.
    pub fn fixed(settings: DisplaySettings, peer: Option<PeerClient>) -> Self {
        Self {
            display: DisplaySource::Fixed(settings),
            peer,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle.
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }
}

/// Status page handler.
///
/// A failing peer degrades the peer row instead of failing the page.
pub async fn index(State(state): State<StatusState>) -> Html<String> {
    info!(route = "/", "Rendering status page");
    metrics::inc_http_requests("/");

    let facts = EnvironmentFacts::capture(state.display.resolve());

    let peer = match &state.peer {
        None => PeerStatus::Disabled,
        Some(client) => match client.fetch().await {
            Ok(body) => {
                info!(url = %client.url(), body = %body, "Peer body");
                PeerStatus::Reached { bytes: body.len() }
            }
            Err(e) => PeerStatus::Unreachable(e.kind()),
        },
    };

    Html(page::render(&facts, &peer))
}

/// Prometheus exposition handler.
pub async fn metrics_text(State(state): State<StatusState>) -> Response {
    metrics::exposition(state.metrics.as_ref())
}
