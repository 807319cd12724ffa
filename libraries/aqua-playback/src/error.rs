//! Error types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Playback errors
///
/// `LoadTimeout`, `Media` and `Resolution` are caused by collaborators and are
/// reported once to the UI as a [`crate::PlaybackEvent::Error`]. `InvalidIndex`
/// never leaves the controller; it is treated as "no track".
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Transport did not become ready within the load bound
    #[error("Loading track {track_id} timed out after {timeout:?}")]
    LoadTimeout { track_id: String, timeout: Duration },

    /// Transport reported a decode or network failure
    #[error("Media error for track {track_id}: {reason}")]
    Media { track_id: String, reason: String },

    /// Catalog could not supply a playable URL
    #[error("Could not resolve track {track_id}: {reason}")]
    Resolution { track_id: String, reason: String },

    /// Navigation produced an index outside the queue
    #[error("Index out of bounds: {0}")]
    InvalidIndex(usize),
}

impl PlaybackError {
    /// Category of this error, as exposed to UI surfaces
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaybackError::LoadTimeout { .. } => ErrorKind::LoadTimeout,
            PlaybackError::Media { .. } => ErrorKind::Media,
            PlaybackError::Resolution { .. } => ErrorKind::Resolution,
            PlaybackError::InvalidIndex(_) => ErrorKind::InvalidIndex,
        }
    }

    /// Track the failure relates to, if any
    pub fn track_id(&self) -> Option<&str> {
        match self {
            PlaybackError::LoadTimeout { track_id, .. }
            | PlaybackError::Media { track_id, .. }
            | PlaybackError::Resolution { track_id, .. } => Some(track_id),
            PlaybackError::InvalidIndex(_) => None,
        }
    }
}

/// Serializable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    LoadTimeout,
    Media,
    Resolution,
    InvalidIndex,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
