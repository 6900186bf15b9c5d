//! Error types for the catalog client.

use thiserror::Error;

/// Errors that can occur when talking to the remote catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Catalog is offline or unreachable
    #[error("Catalog unreachable: {0}")]
    Unreachable(String),

    /// Catalog returned an error response
    #[error("Catalog error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid catalog URL
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse catalog response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<CatalogError> for cadence_core::CadenceError {
    fn from(err: CatalogError) -> Self {
        Self::catalog(err.to_string())
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
