//! Catalog collaborator seam
//!
//! The controller only needs three things from the song catalog: complete a
//! partial track reference, turn a stored stream path into a fetchable URL,
//! and optionally check that URL before handing it to the transport.

use crate::types::Track;
use async_trait::async_trait;
use thiserror::Error;

/// Catalog lookup failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No song with this id
    #[error("song not found: {0}")]
    NotFound(String),

    /// Song exists but has no playable stream
    #[error("song {0} has no stream URL")]
    MissingStreamUrl(String),

    /// Catalog or stream host could not be reached
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog answered with something unusable
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Song catalog used to resolve tracks before playback
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the full descriptor for `id`
    async fn fetch_track(&self, id: &str) -> Result<Track, CatalogError>;

    /// Turn a stored stream location into a directly fetchable URL
    ///
    /// Default: absolute http(s) URLs only.
    fn resolve_stream_url(&self, stream_url: &str) -> Result<String, CatalogError> {
        if stream_url.starts_with("http://") || stream_url.starts_with("https://") {
            Ok(stream_url.to_string())
        } else {
            Err(CatalogError::InvalidResponse(format!(
                "relative stream URL without a base: {}",
                stream_url
            )))
        }
    }

    /// Check that `url` is reachable
    async fn probe_stream(&self, _url: &str) -> Result<(), CatalogError> {
        Ok(())
    }

    /// Count a play of `id` (best effort)
    async fn record_play(&self, _id: &str) -> Result<(), CatalogError> {
        Ok(())
    }
}
