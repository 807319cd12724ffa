//! Platform-agnostic transport trait
//!
//! Abstracts the single audio output resource the controller drives (a
//! browser media element, a native sink, a headless clock).

use crate::types::MediaSource;
use async_trait::async_trait;
use thiserror::Error;

/// Transport failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Source could not be fetched or decoded
    #[error("media error: {0}")]
    Media(String),

    /// Source format is not supported by the output
    #[error("unsupported media: {0}")]
    Unsupported(String),

    /// Load was abandoned because the source was released or replaced
    #[error("source released")]
    Released,
}

/// Notifications from the transport, delivered in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Playback position advanced (seconds)
    Progress(f64),

    /// Media duration became known (seconds)
    DurationKnown(f64),

    /// Playback reached the end of the source
    Ended,

    /// Source failed after loading
    Error(String),
}

/// Single audio output resource
///
/// Implementors own exactly one output for their lifetime. Loading a new
/// source releases or reassigns the previous one. Notifications are sent on a
/// channel owned by the implementation and fed to
/// [`crate::PlaybackController::spawn_event_pump`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Begin buffering `source`
    ///
    /// Resolves once enough data is available to start playback. The
    /// controller bounds the wait; implementations need not time out
    /// themselves.
    async fn load(&self, source: &MediaSource) -> Result<(), TransportError>;

    /// Start or resume the loaded source
    ///
    /// No-op when nothing is loaded.
    fn play(&self) -> Result<(), TransportError>;

    /// Suspend playback (idempotent)
    fn pause(&self);

    /// Jump to `seconds` from the start of the source
    fn seek(&self, seconds: f64);

    /// Set output gain, already clamped to 0.0-1.0
    fn set_volume(&self, level: f32);

    /// Stop and unload the current source
    ///
    /// The transport stays usable for later loads.
    fn release(&self);
}
