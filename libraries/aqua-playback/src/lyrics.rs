//! Timed lyrics lookup

use crate::types::LyricLine;

/// Index of the lyric line active at `elapsed` seconds
///
/// Scans in order and keeps the last line whose start time has been reached,
/// stopping at the first line that starts later or carries no start time.
/// Before the first line starts, line 0 is active. Returns `None` only when
/// there are no lyrics.
pub fn active_line(lyrics: &[LyricLine], elapsed: f64) -> Option<usize> {
    if lyrics.is_empty() {
        return None;
    }

    let mut active = 0;
    for (i, line) in lyrics.iter().enumerate() {
        match line.start_time {
            Some(start) if elapsed >= start => active = i,
            _ => break,
        }
    }
    Some(active)
}
