//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Track descriptor
///
/// Minimal metadata plus a playable URL for one song. Immutable once fetched;
/// identity is `id`. A descriptor without `stream_url` is a partial reference
/// and is completed from the catalog before playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier
    pub id: String,

    /// Song title
    #[serde(default)]
    pub title: String,

    /// Stream location (absolute URL or path relative to the catalog)
    #[serde(default)]
    pub stream_url: Option<String>,

    /// Duration reported by the catalog, in seconds
    #[serde(default)]
    pub duration_seconds: f64,

    /// Performer display names
    #[serde(default)]
    pub performer_names: Vec<String>,

    /// Cover art location
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Timed lyrics, in display order
    #[serde(default)]
    pub lyrics: Vec<LyricLine>,
}

impl Track {
    /// Partial reference carrying only an id
    pub fn partial(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            stream_url: None,
            duration_seconds: 0.0,
            performer_names: Vec::new(),
            cover_url: None,
            lyrics: Vec::new(),
        }
    }

    /// Whether the track still needs a catalog lookup before playback
    pub fn is_partial(&self) -> bool {
        self.stream_url.as_deref().map_or(true, str::is_empty)
    }

    /// Identity comparison (by id only)
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
    }

    /// Performers joined for display, "Unknown" when none are known
    pub fn performers_label(&self) -> String {
        if self.performer_names.is_empty() {
            "Unknown".to_string()
        } else {
            self.performer_names.join(", ")
        }
    }
}

/// One timed lyric line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Offset into the track where the line starts, in seconds
    #[serde(default)]
    pub start_time: Option<f64>,

    /// Lyric text
    #[serde(default)]
    pub line: String,
}

/// What the controller hands to the transport for loading
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    /// Fully resolved, directly fetchable URL
    pub url: String,

    /// Duration from the catalog, if known
    pub duration_hint: Option<f64>,
}

/// Navigation mode
///
/// Cycles `Linear -> RepeatOne -> Shuffle -> Linear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayMode {
    /// Play the queue in order and stop at the end
    #[default]
    Linear,

    /// Replay the current track
    RepeatOne,

    /// Random order, avoiding recently visited indices
    Shuffle,
}

impl PlayMode {
    /// Next mode in the cycle
    pub fn cycle(self) -> Self {
        match self {
            PlayMode::Linear => PlayMode::RepeatOne,
            PlayMode::RepeatOne => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Linear,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayMode::Linear => "linear",
            PlayMode::RepeatOne => "repeat-one",
            PlayMode::Shuffle => "shuffle",
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown play mode name
#[derive(Debug, Clone, Error)]
#[error("Unknown play mode '{0}' (expected linear, repeat-one or shuffle)")]
pub struct ParseModeError(String);

impl FromStr for PlayMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(PlayMode::Linear),
            "repeat-one" | "repeat" => Ok(PlayMode::RepeatOne),
            "shuffle" => Ok(PlayMode::Shuffle),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Playback state as seen by UI surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackState {
    /// Nothing playing (no track, finished, or failed)
    Idle,

    /// Waiting for the transport to become ready
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Upper bound on transport readiness (default: 10000)
    pub load_timeout_ms: u64,

    /// Pause between a track ending and the automatic advance (default: 500)
    pub advance_delay_ms: u64,

    /// Volume at start and after reset, 0.0-1.0 (default: 1.0)
    pub default_volume: f32,

    /// Initial navigation mode (default: linear)
    pub mode: PlayMode,

    /// Check stream reachability before loading (default: true)
    pub probe_streams: bool,

    /// Length of the recently-played list (default: 5)
    pub recent_limit: usize,

    /// Fixed shuffle seed; entropy-seeded when absent
    pub shuffle_seed: Option<u64>,
}

impl PlaybackConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: 10_000,
            advance_delay_ms: 500,
            default_volume: 1.0,
            mode: PlayMode::Linear,
            probe_streams: true,
            recent_limit: 5,
            shuffle_seed: None,
        }
    }
}
