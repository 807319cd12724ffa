//! Read-only session projection for UI surfaces

use crate::types::{PlayMode, PlaybackState, Track};
use serde::{Deserialize, Serialize};

/// Everything the mini-player bar renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current_track: Option<Track>,
    pub current_index: Option<usize>,
    pub queue_len: usize,
    pub state: PlaybackState,
    pub is_playing: bool,
    /// Seconds into the current track
    pub elapsed: f64,
    /// Track length in seconds (0 when unknown)
    pub duration: f64,
    pub volume: f32,
    pub mode: PlayMode,
    pub has_next: bool,
    pub has_previous: bool,
    /// Active lyric line, none without lyrics
    pub lyric_index: Option<usize>,
    /// Most recent first
    pub recently_played: Vec<String>,
}

impl SessionSnapshot {
    pub fn elapsed_label(&self) -> String {
        format_clock(self.elapsed)
    }

    pub fn duration_label(&self) -> String {
        format_clock(self.duration)
    }

    /// Lyric text at the current position
    pub fn lyric_line(&self) -> Option<&str> {
        let track = self.current_track.as_ref()?;
        let index = self.lyric_index?;
        track.lyrics.get(index).map(|l| l.line.as_str())
    }
}

/// Format seconds as `mm:ss`
///
/// Minutes are not wrapped into hours; negative and non-finite input shows
/// as `00:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}
