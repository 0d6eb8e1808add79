//! Outbound call to the peer service.

use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::PeerError;
use crate::metrics;

/// HTTP client for the configured peer.
#[derive(Debug, Clone)]
pub struct PeerClient {
    http: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl PeerClient {
    /// Create a client for `url` with a total request timeout.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, PeerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| PeerError::Request(e.to_string()))?;

        Ok(Self { http, url, timeout })
    }

    /// Peer address.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// GET the peer and return the response body.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<String, PeerError> {
        let start = Instant::now();
        let result = self.send().await;
        metrics::record_peer_latency(start);

        if let Err(e) = &result {
            warn!(error = %e, "Peer request failed");
            metrics::inc_peer_errors(e.kind());
        }

        result
    }

    async fn send(&self) -> Result<String, PeerError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!(bytes = body.len(), "Peer responded");
        Ok(body)
    }

    fn classify(&self, err: reqwest::Error) -> PeerError {
        if err.is_timeout() {
            PeerError::Timeout(self.timeout)
        } else if err.is_connect() {
            PeerError::Unreachable(err.to_string())
        } else {
            PeerError::Request(err.to_string())
        }
    }
}
