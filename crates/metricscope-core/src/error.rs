//! Shared error type across metricscope crates.

use thiserror::Error;

/// Stable error codes (surfaced by tooling and exit messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input (label sets, config values).
    BadRequest,
    /// Snapshot lookup failed.
    Query,
    /// JSON encoding or decoding failed.
    Json,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal failure (I/O and the like).
    Internal,
}

impl ErrorCode {
    /// String representation used in tool output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Query => "QUERY",
            ErrorCode::Json => "JSON",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Raised by snapshot lookups that match zero or several metrics.
///
/// Both causes share this one type; the message tells them apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MetricQueryError {
    message: String,
}

impl MetricQueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and export.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("metric query failed: {0}")]
    Query(#[from] MetricQueryError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MetricsError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MetricsError::BadRequest(_) => ErrorCode::BadRequest,
            MetricsError::Query(_) => ErrorCode::Query,
            MetricsError::Json(_) => ErrorCode::Json,
            MetricsError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            MetricsError::Internal(_) => ErrorCode::Internal,
        }
    }
}
