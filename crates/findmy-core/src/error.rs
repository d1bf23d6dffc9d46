//! Error types for locator calls and registry loading.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for locator operations.
pub type LocateResult<T> = Result<T, LocateError>;

/// Result type alias for registry loading.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while talking to the locator.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("invalid locator url: {0}")]
    InvalidUrl(String),

    #[error("failed to connect to locator at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http error: {0}")]
    Http(String),

    #[error("locator returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed locator response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("locate timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that abort startup while loading the device registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("device listing failed: {0}")]
    Listing(#[from] LocateError),

    #[error("no devices found in device listing")]
    Empty,
}
