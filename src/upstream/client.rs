//! Upstream transport
//!
//! [`Upstream`] is the only seam between the fetcher and the network, so
//! tests can swap in an in-memory catalog.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{DexError, Result};

/// Source of decoded JSON documents, addressed by URL.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetches and decodes the document at `url`.
    ///
    /// Non-success statuses, transport errors and timeouts must all come back
    /// as [`DexError::FetchFailed`].
    async fn get_json(&self, url: &str) -> Result<Value>;
}

// == HTTP Upstream ==
/// reqwest-backed transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dexcache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DexError::transport("http client", e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!(url, "upstream request");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DexError::status(
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("upstream error"),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| transport_error(url, e))
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> DexError {
    if err.is_timeout() {
        DexError::timeout(url)
    } else {
        DexError::transport(url, err.to_string())
    }
}
