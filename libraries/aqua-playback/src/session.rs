//! Playback session state
//!
//! The session is a single state record mutated only through
//! [`Session::apply`]. Each action is a plain state transition; the
//! transport and catalog side effects live in the controller. The reducer
//! enforces the session invariants:
//! - `is_playing` only with a ready source
//! - `elapsed` within `[0, duration]` once the duration is known
//! - `elapsed` back to 0 on every track change
//!
//! Every observable change queues a [`PlaybackEvent`].

use crate::error::PlaybackError;
use crate::events::PlaybackEvent;
use crate::lyrics::active_line;
use crate::navigation::{self, NavigationContext, NextPick, ShuffleHistory};
use crate::queue::Queue;
use crate::recent::RecentlyPlayed;
use crate::snapshot::SessionSnapshot;
use crate::types::{PlayMode, PlaybackConfig, PlaybackState, Track};
use crate::volume::Volume;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// State transitions understood by [`Session::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Replace the queue; shuffle history restarts at `start_index`
    QueueReplaced {
        tracks: Vec<Track>,
        start_index: Option<usize>,
    },

    /// Move the queue's active index (rejected when out of range)
    QueuePositionChanged(usize),

    /// Point the queue back at the current track after a request fell
    /// through; the hint is its last known position
    QueueRealigned(Option<usize>),

    /// Adopt the history produced by a shuffle pick
    ShuffleHistoryCommitted(ShuffleHistory),

    /// A new user or navigation request supersedes older ones
    RequestStarted,

    /// Track became current and its source is being loaded
    TrackLoading(Track),

    /// Transport is ready to play the current source
    TrackReady,

    /// Transport started playing
    Playing,

    /// Transport paused
    Paused,

    /// Loading the current source failed
    LoadFailed,

    /// Loaded source failed during playback
    MediaFailed,

    /// First play of the current track was counted
    PlayRecorded,

    /// Transport progress (seconds)
    Progress(f64),

    /// Transport learned the media duration (seconds)
    DurationKnown(f64),

    /// Position moved by the user (seconds, clamped)
    Seeked(f64),

    /// Source played to its end
    Ended,

    /// Volume changed (clamped)
    VolumeChanged(f32),

    /// Advance to the next navigation mode
    ModeCycled,

    /// Clear everything back to defaults
    Reset,
}

/// Live playback session
#[derive(Debug)]
pub struct Session {
    queue: Queue,
    current_track: Option<Track>,
    state: PlaybackState,
    source_ready: bool,
    play_recorded: bool,
    elapsed: f64,
    duration: f64,
    volume: Volume,
    mode: PlayMode,
    shuffle_history: ShuffleHistory,
    epoch: u64,
    recent: RecentlyPlayed,
    pending_events: Vec<PlaybackEvent>,
    rng: StdRng,
    default_volume: f32,
    default_mode: PlayMode,
}

impl Session {
    /// Create a session with the configured defaults
    pub fn new(config: &PlaybackConfig) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            queue: Queue::new(),
            current_track: None,
            state: PlaybackState::Idle,
            source_ready: false,
            play_recorded: false,
            elapsed: 0.0,
            duration: 0.0,
            volume: Volume::new(config.default_volume),
            mode: config.mode,
            shuffle_history: ShuffleHistory::new(),
            epoch: 0,
            recent: RecentlyPlayed::new(config.recent_limit),
            pending_events: Vec::new(),
            rng,
            default_volume: config.default_volume,
            default_mode: config.mode,
        }
    }

    /// Apply one transition
    ///
    /// Returns false when the action was rejected and nothing changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::QueueReplaced {
                tracks,
                start_index,
            } => {
                self.queue.set_queue(tracks, start_index);
                self.shuffle_history.reset_to(self.queue.current_index());
                self.emit(PlaybackEvent::QueueChanged {
                    length: self.queue.len(),
                });
                true
            }

            SessionAction::QueuePositionChanged(index) => self.queue.advance_to(index),

            SessionAction::QueueRealigned(hint) => {
                let index = self.current_track.as_ref().and_then(|current| {
                    hint.filter(|&i| self.queue.track(i).is_some_and(|t| t.same_as(current)))
                        .or_else(|| self.queue.position_of(&current.id))
                });
                match index {
                    Some(index) => self.queue.advance_to(index),
                    None => {
                        self.queue.detach();
                        true
                    }
                }
            }

            SessionAction::ShuffleHistoryCommitted(history) => {
                self.shuffle_history = history;
                true
            }

            SessionAction::RequestStarted => {
                self.epoch = self.epoch.wrapping_add(1);
                true
            }

            SessionAction::TrackLoading(track) => {
                let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());
                let changed = previous_track_id.as_deref() != Some(track.id.as_str());

                self.duration = sanitize(track.duration_seconds);
                self.elapsed = 0.0;
                self.source_ready = false;
                self.play_recorded = false;

                if changed {
                    self.emit(PlaybackEvent::TrackChanged {
                        track_id: track.id.clone(),
                        previous_track_id,
                    });
                }
                self.current_track = Some(track);
                self.set_state(PlaybackState::Loading);
                self.emit_position();
                true
            }

            SessionAction::TrackReady => {
                if self.state != PlaybackState::Loading || self.current_track.is_none() {
                    return false;
                }
                self.source_ready = true;
                true
            }

            SessionAction::Playing => {
                if !self.source_ready || self.current_track.is_none() {
                    return false;
                }
                self.set_state(PlaybackState::Playing);
                true
            }

            SessionAction::Paused => {
                let next = match self.state {
                    PlaybackState::Playing => PlaybackState::Paused,
                    PlaybackState::Loading => PlaybackState::Idle,
                    other => other,
                };
                self.set_state(next);
                true
            }

            SessionAction::LoadFailed | SessionAction::MediaFailed => {
                self.source_ready = false;
                self.set_state(PlaybackState::Idle);
                true
            }

            SessionAction::PlayRecorded => {
                let Some(track) = self.current_track.as_ref() else {
                    return false;
                };
                if self.play_recorded {
                    return false;
                }
                self.play_recorded = true;
                self.recent.push(&track.id);
                true
            }

            SessionAction::Progress(elapsed) => {
                if self.current_track.is_none() {
                    return false;
                }
                self.elapsed = self.clamp_position(elapsed);
                self.emit_position();
                true
            }

            SessionAction::DurationKnown(duration) => {
                if self.current_track.is_none() {
                    return false;
                }
                self.duration = sanitize(duration);
                self.elapsed = self.clamp_position(self.elapsed);
                self.emit_position();
                true
            }

            SessionAction::Seeked(position) => {
                if self.current_track.is_none() {
                    return false;
                }
                self.elapsed = self.clamp_position(position);
                self.emit_position();
                true
            }

            SessionAction::Ended => {
                if self.current_track.is_none() {
                    return false;
                }
                self.elapsed = 0.0;
                self.set_state(PlaybackState::Idle);
                self.emit_position();
                true
            }

            SessionAction::VolumeChanged(level) => {
                self.volume.set_level(level);
                self.emit(PlaybackEvent::VolumeChanged {
                    level: self.volume.level(),
                });
                true
            }

            SessionAction::ModeCycled => {
                self.mode = self.mode.cycle();
                if self.mode == PlayMode::Shuffle {
                    self.shuffle_history.reset_to(self.queue.current_index());
                }
                self.emit(PlaybackEvent::ModeChanged { mode: self.mode });
                true
            }

            SessionAction::Reset => {
                self.queue.clear();
                self.current_track = None;
                self.state = PlaybackState::Idle;
                self.source_ready = false;
                self.play_recorded = false;
                self.elapsed = 0.0;
                self.duration = 0.0;
                self.volume = Volume::new(self.default_volume);
                self.mode = self.default_mode;
                self.shuffle_history.clear();
                self.recent.clear();
                self.epoch = self.epoch.wrapping_add(1);
                // Undrained notifications (errors included) stay ahead of the reset
                self.emit(PlaybackEvent::SessionReset);
                true
            }
        }
    }

    /// Queue the user-facing notification for a failure
    pub fn report(&mut self, error: &PlaybackError) {
        self.emit(PlaybackEvent::Error {
            kind: error.kind(),
            track_id: error.track_id().map(str::to_string),
            message: error.to_string(),
        });
    }

    // ===== Navigation =====

    fn navigation(&self) -> NavigationContext<'_> {
        NavigationContext {
            queue_len: self.queue.len(),
            current_index: self.queue.current_index(),
            mode: self.mode,
            shuffle_history: &self.shuffle_history,
        }
    }

    /// Next index per the navigation policy (history not yet committed)
    pub fn pick_next(&mut self) -> Option<NextPick> {
        let Self {
            queue,
            mode,
            shuffle_history,
            rng,
            ..
        } = self;
        // Built from the fields so `rng` can be borrowed mutably alongside
        let ctx = NavigationContext {
            queue_len: queue.len(),
            current_index: queue.current_index(),
            mode: *mode,
            shuffle_history,
        };
        navigation::next_index(&ctx, rng)
    }

    /// Previous index per the navigation policy
    pub fn pick_previous(&self) -> Option<usize> {
        navigation::previous_index(&self.navigation())
    }

    // ===== Queries =====

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Whether `track` is the current track (by id)
    pub fn is_current(&self, track: &Track) -> bool {
        self.current_track.as_ref().is_some_and(|t| t.same_as(track))
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_loading(&self) -> bool {
        self.state == PlaybackState::Loading
    }

    pub fn source_ready(&self) -> bool {
        self.source_ready
    }

    pub fn play_recorded(&self) -> bool {
        self.play_recorded
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn shuffle_history(&self) -> &ShuffleHistory {
        &self.shuffle_history
    }

    /// Current request epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Clamp a position into `[0, duration]` (upper bound only once known)
    pub fn clamp_position(&self, seconds: f64) -> f64 {
        let seconds = sanitize(seconds);
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }

    /// Observable projection for UI surfaces
    pub fn snapshot(&self) -> SessionSnapshot {
        let ctx = self.navigation();
        SessionSnapshot {
            current_track: self.current_track.clone(),
            current_index: self.queue.current_index(),
            queue_len: self.queue.len(),
            state: self.state,
            is_playing: self.is_playing(),
            elapsed: self.elapsed,
            duration: self.duration,
            volume: self.volume.level(),
            mode: self.mode,
            has_next: navigation::has_next(&ctx),
            has_previous: navigation::has_previous(&ctx),
            lyric_index: self
                .current_track
                .as_ref()
                .and_then(|t| active_line(&t.lyrics, self.elapsed)),
            recently_played: self.recent.to_vec(),
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionUpdate {
            elapsed: self.elapsed,
            duration: self.duration,
        });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        // Consecutive position updates collapse into the latest one
        if matches!(event, PlaybackEvent::PositionUpdate { .. })
            && matches!(
                self.pending_events.last(),
                Some(PlaybackEvent::PositionUpdate { .. })
            )
        {
            self.pending_events.pop();
        }
        self.pending_events.push(event);
    }
}

/// Non-finite and negative seconds count as 0
fn sanitize(seconds: f64) -> f64 {
    if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    }
}
