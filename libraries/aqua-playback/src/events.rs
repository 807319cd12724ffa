//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued by
//! the session as it changes and collected with
//! [`crate::PlaybackController::drain_events`]:
//! - State changes (loading/playing/paused/idle)
//! - Track changes
//! - Position updates from the transport
//! - Volume, mode and queue changes
//! - User-facing error notifications (one per failure)

use crate::error::ErrorKind;
use crate::types::{PlayMode, PlaybackState};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position update (driven by transport progress)
    PositionUpdate {
        /// Elapsed seconds
        elapsed: f64,
        /// Track duration in seconds (0 when unknown)
        duration: f64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
    },

    /// Navigation mode changed
    ModeChanged { mode: PlayMode },

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// A request failed; shown to the user once
    Error {
        kind: ErrorKind,
        /// Track the failure relates to
        track_id: Option<String>,
        /// Human-readable message
        message: String,
    },

    /// Session cleared back to defaults (sign-out)
    SessionReset,
}

impl PlaybackEvent {
    /// Whether this is an error notification
    pub fn is_error(&self) -> bool {
        matches!(self, PlaybackEvent::Error { .. })
    }
}
