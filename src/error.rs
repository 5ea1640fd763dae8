//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Dex Error Enum ==
/// Unified error type for the catalog service.
#[derive(Error, Debug)]
pub enum DexError {
    /// Upstream call failed: non-success status, transport error or timeout.
    ///
    /// `status` is `None` when no usable HTTP response was received;
    /// `timed_out` marks the per-request timeout firing.
    #[error("Fetch failed for {key}: {reason}")]
    FetchFailed {
        key: String,
        status: Option<u16>,
        reason: String,
        timed_out: bool,
    },

    /// A reference string did not contain a parsable identifier
    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    /// Upstream payload did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Catalog has not finished (or failed) its initial load
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Recently-visited persistence failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DexError {
    // == Constructors ==
    /// Builds a `FetchFailed` for a non-success upstream status.
    pub fn status(key: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        DexError::FetchFailed {
            key: key.into(),
            status: Some(status),
            reason: reason.into(),
            timed_out: false,
        }
    }

    /// Builds a `FetchFailed` for a failure with no usable upstream
    /// response (connection error, undecodable body).
    pub fn transport(key: impl Into<String>, reason: impl Into<String>) -> Self {
        DexError::FetchFailed {
            key: key.into(),
            status: None,
            reason: reason.into(),
            timed_out: false,
        }
    }

    /// Builds a `FetchFailed` for a request that hit the fetch timeout.
    pub fn timeout(key: impl Into<String>) -> Self {
        DexError::FetchFailed {
            key: key.into(),
            status: None,
            reason: "timed out".to_string(),
            timed_out: true,
        }
    }

    /// Whether this is a `FetchFailed` caused by the fetch timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DexError::FetchFailed { timed_out: true, .. })
    }

    /// Upstream status carried by a `FetchFailed`, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            DexError::FetchFailed { status, .. } => *status,
            _ => None,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for DexError {
    fn into_response(self) -> Response {
        let status = match &self {
            DexError::FetchFailed {
                status: Some(404), ..
            } => StatusCode::NOT_FOUND,
            DexError::FetchFailed {
                timed_out: true, ..
            } => StatusCode::GATEWAY_TIMEOUT,
            DexError::FetchFailed { .. } => StatusCode::BAD_GATEWAY,
            DexError::MalformedReference(_) | DexError::Decode(_) => StatusCode::BAD_GATEWAY,
            DexError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DexError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            DexError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, DexError>;
