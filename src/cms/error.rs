//! Error types for the document-query client.

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for all document store operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying HTTP client error (unreachable host, timeout, bad body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The response body was not the expected JSON shape.
    #[error("invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A configured or returned URL could not be parsed.
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The API entry point did not advertise a master ref.
    #[error("no master ref advertised by the api")]
    NoMasterRef,
    /// The payload parsed but violates an expected property.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, Error>;
