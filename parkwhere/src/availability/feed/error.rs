//! Error types for the availability feed.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when fetching the availability feed.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Request failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("Feed returned HTTP {0}")]
    Status(u16),

    /// Body is not the expected JSON shape.
    #[error("Failed to parse feed response: {0}")]
    Json(String),

    /// Response contained no items.
    #[error("Feed response contained no items")]
    EmptyResponse,

    /// Fetch did not complete in time.
    #[error("Feed fetch timed out after {0:?}")]
    Timeout(Duration),
}
