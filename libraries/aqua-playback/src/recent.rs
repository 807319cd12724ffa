//! Recently played tracks
//!
//! Bounded, most-recent-first list of track ids. Replaying a track moves it
//! to the front instead of duplicating it.

use std::collections::VecDeque;

/// Recently played track ids with bounded size
#[derive(Debug, Clone)]
pub struct RecentlyPlayed {
    /// Track ids (most recent = front)
    ids: VecDeque<String>,

    /// Maximum list size
    max_size: usize,
}

impl RecentlyPlayed {
    /// Create a list holding at most `max_size` ids
    pub fn new(max_size: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a play
    ///
    /// Moves an existing entry to the front; drops the oldest when full.
    pub fn push(&mut self, track_id: &str) {
        if self.max_size == 0 {
            return;
        }
        self.ids.retain(|id| id != track_id);
        self.ids.push_front(track_id.to_string());
        self.ids.truncate(self.max_size);
    }

    /// Most recently played id
    pub fn latest(&self) -> Option<&str> {
        self.ids.front().map(String::as_str)
    }

    /// All ids (most recent first)
    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(5)
    }
}
