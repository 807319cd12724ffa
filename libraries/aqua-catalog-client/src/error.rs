//! Error types for the catalog client.

use aqua_playback::CatalogError;
use thiserror::Error;

/// Errors that can occur when talking to the song catalog.
#[derive(Error, Debug)]
pub enum CatalogClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No song (or stream) at the requested location
    #[error("Not found: {0}")]
    NotFound(String),

    /// Song has no stream URL
    #[error("Song {0} has no stream URL")]
    MissingStreamUrl(String),

    /// Invalid base or stream URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl CatalogClientError {
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            CatalogClientError::ServerUnreachable(e.to_string())
        } else {
            CatalogClientError::Request(e)
        }
    }
}

impl From<CatalogClientError> for CatalogError {
    fn from(e: CatalogClientError) -> Self {
        match e {
            CatalogClientError::NotFound(what) => CatalogError::NotFound(what),
            CatalogClientError::MissingStreamUrl(id) => CatalogError::MissingStreamUrl(id),
            CatalogClientError::ServerUnreachable(_)
            | CatalogClientError::Request(_)
            | CatalogClientError::ServerError { .. } => CatalogError::Unavailable(e.to_string()),
            CatalogClientError::InvalidUrl(_) | CatalogClientError::ParseError(_) => {
                CatalogError::InvalidResponse(e.to_string())
            }
        }
    }
}

/// Result type for catalog client operations.
pub type Result<T> = std::result::Result<T, CatalogClientError>;
