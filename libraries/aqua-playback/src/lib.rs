//! Aqua Archive - Mini-Player Playback
//!
//! Playback queue controller behind the Aqua Archive mini-player.
//!
//! This crate provides:
//! - Playback queue with an active index
//! - Navigation modes (linear, repeat-one, shuffle with recent-history window)
//! - Session state container with explicit transitions
//! - Volume, seek, timed lyrics and a recently-played list
//! - "Last request wins" handling of overlapping play requests
//!
//! # Architecture
//!
//! `aqua-playback` does not talk to audio hardware or HTTP itself:
//! - Audio output is a [`Transport`] (browser element, native sink, headless clock)
//! - Song lookup is a [`Catalog`] (see `aqua-catalog-client`)
//!
//! The [`PlaybackController`] owns the session and is the only component that
//! calls the transport. UI surfaces read [`SessionSnapshot`]s and drain
//! [`PlaybackEvent`]s.
//!
//! # Example: Wiring a controller
//!
//! ```rust,no_run
//! use aqua_playback::{
//!     Catalog, CatalogError, MediaSource, PlaybackConfig, PlaybackController, Track,
//!     Transport, TransportError,
//! };
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Silent;
//!
//! #[async_trait]
//! impl Transport for Silent {
//!     async fn load(&self, _source: &MediaSource) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//!     fn play(&self) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//!     fn pause(&self) {}
//!     fn seek(&self, _seconds: f64) {}
//!     fn set_volume(&self, _level: f32) {}
//!     fn release(&self) {}
//! }
//!
//! struct NoCatalog;
//!
//! #[async_trait]
//! impl Catalog for NoCatalog {
//!     async fn fetch_track(&self, id: &str) -> Result<Track, CatalogError> {
//!         Err(CatalogError::NotFound(id.to_string()))
//!     }
//! }
//!
//! # async fn demo() -> aqua_playback::Result<()> {
//! let controller = Arc::new(PlaybackController::new(
//!     PlaybackConfig::default(),
//!     Arc::new(Silent),
//!     Arc::new(NoCatalog),
//! ));
//!
//! let track = Track {
//!     stream_url: Some("https://cdn.example/song.mp3".to_string()),
//!     ..Track::partial("song-1")
//! };
//! controller.play_or_toggle(track, None).await?;
//!
//! let snapshot = controller.snapshot();
//! println!("{} / {}", snapshot.elapsed_label(), snapshot.duration_label());
//! # Ok(())
//! # }
//! ```

mod catalog;
mod controller;
mod error;
mod events;
mod lyrics;
pub mod navigation;
mod queue;
mod recent;
pub mod session;
mod snapshot;
mod transport;
pub mod types;
mod volume;

// Public exports
pub use catalog::{Catalog, CatalogError};
pub use controller::{PlayOutcome, PlaybackController};
pub use error::{ErrorKind, PlaybackError, Result};
pub use events::PlaybackEvent;
pub use lyrics::active_line;
pub use queue::Queue;
pub use recent::RecentlyPlayed;
pub use snapshot::{format_clock, SessionSnapshot};
pub use transport::{Transport, TransportError, TransportEvent};
pub use types::{LyricLine, MediaSource, PlayMode, PlaybackConfig, PlaybackState, Track};
pub use volume::Volume;
