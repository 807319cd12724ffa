//! Queue store
//!
//! Ordered tracks available for playback plus the index of the active one.
//! The queue is replaced wholesale whenever playback starts from a new
//! context (a song list, a playlist, or a lone track).

use crate::types::Track;

/// Playback queue
///
/// Structure:
/// ```text
/// tracks:        [S1, S2, S3, S4]
/// current_index:       ^ Some(1)
/// ```
/// `current_index` is `None` when the current track is not part of the queue.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Tracks in traversal order
    tracks: Vec<Track>,

    /// Position of the current track
    current_index: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace tracks and active index in one step
    ///
    /// A start index outside the new queue is stored as `None`.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: Option<usize>) {
        self.current_index = start_index.filter(|&i| i < tracks.len());
        self.tracks = tracks;
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// Current index (`None` = not part of the queue)
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Move the active index
    ///
    /// Returns false and leaves the queue untouched when `index` is out of range.
    pub fn advance_to(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current_index = Some(index);
            true
        } else {
            false
        }
    }

    /// Forget the active index without touching the tracks
    pub fn detach(&mut self) {
        self.current_index = None;
    }

    /// Track at `index`
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// First position of the track with this id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Remove all tracks
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current_index = None;
    }
}
