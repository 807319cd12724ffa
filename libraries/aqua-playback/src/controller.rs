//! Playback controller - request orchestration
//!
//! Turns user actions and transport notifications into session transitions
//! and transport calls. Every request that can be overtaken captures the
//! session epoch; an asynchronous result is acted on only while that epoch is
//! still current, so the most recent request always wins.

use crate::catalog::{Catalog, CatalogError};
use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::session::{Session, SessionAction};
use crate::snapshot::SessionSnapshot;
use crate::transport::{Transport, TransportEvent};
use crate::types::{MediaSource, PlayMode, PlaybackConfig, Track};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What a play or navigation request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A new track was loaded and is playing
    Started,
    /// The current track was paused
    Paused,
    /// The current track resumed
    Resumed,
    /// The current track restarted from the beginning
    Restarted,
    /// A newer request took over before this one finished
    Superseded,
    /// Nothing to do
    Ignored,
}

/// Synchronous part of a request, decided under the session lock
enum Step {
    Done {
        outcome: PlayOutcome,
        record: Option<String>,
    },
    Load {
        track: Track,
        epoch: u64,
        /// Queue position of the track playing before this request
        restore_index: Option<usize>,
    },
}

impl Step {
    fn done(outcome: PlayOutcome) -> Self {
        Step::Done {
            outcome,
            record: None,
        }
    }
}

/// Mini-player playback controller
///
/// Owns the session and is the only caller of the transport. Share it as
/// `Arc<PlaybackController>`; all actions take `&self`.
pub struct PlaybackController {
    config: PlaybackConfig,
    session: Mutex<Session>,
    transport: Arc<dyn Transport>,
    catalog: Arc<dyn Catalog>,
}

impl PlaybackController {
    /// Create a controller with an empty session
    pub fn new(
        config: PlaybackConfig,
        transport: Arc<dyn Transport>,
        catalog: Arc<dyn Catalog>,
    ) -> Self {
        let session = Session::new(&config);
        transport.set_volume(session.volume());

        Self {
            config,
            session: Mutex::new(session),
            transport,
            catalog,
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    // ===== User actions =====

    /// Play `track`, or toggle it if it is already current
    ///
    /// With `queue`, the queue is replaced first and playback starts at the
    /// position of `track` in it. Without one, a track already queued is
    /// advanced to; any other track plays on its own with an empty queue.
    pub async fn play_or_toggle(&self, track: Track, queue: Option<Vec<Track>>) -> Result<PlayOutcome> {
        let step = {
            let mut session = self.session();
            let restore_index = session.queue().current_index();

            match queue {
                Some(tracks) => {
                    let start_index = tracks.iter().position(|t| t.same_as(&track));
                    session.apply(SessionAction::QueueReplaced {
                        tracks,
                        start_index,
                    });
                }
                None => match session.queue().position_of(&track.id) {
                    Some(index) => {
                        session.apply(SessionAction::QueuePositionChanged(index));
                    }
                    None if !session.is_current(&track) => {
                        session.apply(SessionAction::QueueReplaced {
                            tracks: Vec::new(),
                            start_index: None,
                        });
                    }
                    None => {}
                },
            }

            if session.is_current(&track) && session.is_loading() {
                debug!(track_id = %track.id, "Load already pending, ignoring repeat request");
                Step::done(PlayOutcome::Ignored)
            } else if session.is_current(&track) && session.source_ready() {
                self.toggle(&mut session)?
            } else {
                session.apply(SessionAction::RequestStarted);
                Step::Load {
                    track,
                    epoch: session.epoch(),
                    restore_index,
                }
            }
        };

        self.run(step).await
    }

    /// Toggle the current track between playing and paused
    ///
    /// No-op without a ready source.
    pub async fn toggle_play_pause(&self) -> Result<PlayOutcome> {
        let step = {
            let mut session = self.session();
            if session.current_track().is_none() || !session.source_ready() {
                return Ok(PlayOutcome::Ignored);
            }
            self.toggle(&mut session)?
        };

        self.run(step).await
    }

    /// Pause playback (idempotent)
    ///
    /// Also discards any pending load or automatic advance.
    pub fn pause(&self) {
        let mut session = self.session();
        session.apply(SessionAction::RequestStarted);
        self.pause_locked(&mut session);
    }

    /// Jump to `seconds`, clamped to the track length
    pub fn seek(&self, seconds: f64) {
        let mut session = self.session();
        if session.current_track().is_none() {
            return;
        }
        let position = session.clamp_position(seconds);
        self.transport.seek(position);
        session.apply(SessionAction::Seeked(position));
    }

    /// Set volume, clamped to 0.0-1.0 (NaN counts as 0)
    pub fn set_volume(&self, level: f32) {
        let mut session = self.session();
        session.apply(SessionAction::VolumeChanged(level));
        self.transport.set_volume(session.volume());
    }

    /// Advance to the next navigation mode and return it
    pub fn cycle_mode(&self) -> PlayMode {
        let mut session = self.session();
        session.apply(SessionAction::ModeCycled);
        info!(mode = %session.mode(), "Navigation mode changed");
        session.mode()
    }

    /// Play the next track per the navigation mode
    ///
    /// Pauses when there is no next track.
    pub async fn play_next(&self) -> Result<PlayOutcome> {
        let step = {
            let mut session = self.session();
            session.apply(SessionAction::RequestStarted);
            self.next_step(&mut session)?
        };

        self.run(step).await
    }

    /// Play the previous track per the navigation mode
    pub async fn play_previous(&self) -> Result<PlayOutcome> {
        let step = {
            let mut session = self.session();
            match session.pick_previous() {
                Some(index) => {
                    session.apply(SessionAction::RequestStarted);
                    self.navigate_step(&mut session, index)?
                }
                None => Step::done(PlayOutcome::Ignored),
            }
        };

        self.run(step).await
    }

    /// Stop playback and clear the session (sign-out)
    pub fn reset_session(&self) {
        let mut session = self.session();
        self.transport.release();
        session.apply(SessionAction::Reset);
        self.transport.set_volume(session.volume());
        info!("Playback session reset");
    }

    /// Release the transport (unmount)
    pub fn shutdown(&self) {
        let mut session = self.session();
        session.apply(SessionAction::RequestStarted);
        self.pause_locked(&mut session);
        self.transport.release();
        debug!("Playback controller shut down");
    }

    // ===== Observation =====

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    /// Take the events queued since the last call
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        self.session().drain_events()
    }

    // ===== Transport notifications =====

    /// Current track reached its end
    ///
    /// Rewinds, waits the advance delay, then advances like
    /// [`Self::play_next`] unless another request came in meanwhile.
    pub async fn on_track_ended(&self) -> Result<PlayOutcome> {
        let epoch = {
            let mut session = self.session();
            if session.is_loading() || session.current_track().is_none() {
                debug!("Ignoring end of track while nothing is loaded");
                return Ok(PlayOutcome::Ignored);
            }
            self.transport.seek(0.0);
            session.apply(SessionAction::Ended);
            session.apply(SessionAction::RequestStarted);
            session.epoch()
        };

        tokio::time::sleep(self.config.advance_delay()).await;

        let step = {
            let mut session = self.session();
            if session.epoch() != epoch {
                debug!("Automatic advance superseded");
                return Ok(PlayOutcome::Superseded);
            }
            self.next_step(&mut session)?
        };

        self.run(step).await
    }

    /// Handle one transport notification to completion
    pub async fn handle_transport_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Progress(elapsed) => {
                let mut session = self.session();
                // Progress from a source being replaced
                if !session.is_loading() {
                    session.apply(SessionAction::Progress(elapsed));
                }
            }
            TransportEvent::DurationKnown(duration) => {
                let mut session = self.session();
                if !session.is_loading() {
                    session.apply(SessionAction::DurationKnown(duration));
                }
            }
            TransportEvent::Ended => {
                if let Err(e) = self.on_track_ended().await {
                    debug!(error = %e, "Automatic advance failed");
                }
            }
            TransportEvent::Error(reason) => {
                let mut session = self.session();
                // A failing load reports through its own result
                if session.is_loading() {
                    return;
                }
                let Some(track_id) = session.current_track().map(|t| t.id.clone()) else {
                    return;
                };
                let error = PlaybackError::Media { track_id, reason };
                warn!(error = %error, "Playback failed");
                self.transport.pause();
                session.apply(SessionAction::MediaFailed);
                session.report(&error);
            }
        }
    }

    /// Feed transport notifications to the controller in order
    ///
    /// Each event is handled to completion before the next is received. The
    /// task ends when the sending side is dropped.
    pub fn spawn_event_pump(self: &Arc<Self>, mut events: mpsc::Receiver<TransportEvent>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                controller.handle_transport_event(event).await;
            }
            debug!("Transport event channel closed");
        })
    }

    // ===== Internal =====

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pause_locked(&self, session: &mut Session) {
        if session.is_playing() || session.is_loading() {
            self.transport.pause();
        }
        session.apply(SessionAction::Paused);
    }

    fn toggle(&self, session: &mut Session) -> Result<Step> {
        session.apply(SessionAction::RequestStarted);

        if session.is_playing() {
            self.transport.pause();
            session.apply(SessionAction::Paused);
            return Ok(Step::done(PlayOutcome::Paused));
        }

        let record = self.start_playing(session)?;
        Ok(Step::Done {
            outcome: PlayOutcome::Resumed,
            record,
        })
    }

    fn next_step(&self, session: &mut Session) -> Result<Step> {
        match session.pick_next() {
            Some(pick) => {
                session.apply(SessionAction::ShuffleHistoryCommitted(pick.history));
                self.navigate_step(session, pick.index)
            }
            None => {
                debug!("No next track, pausing");
                self.pause_locked(session);
                Ok(Step::done(PlayOutcome::Paused))
            }
        }
    }

    fn navigate_step(&self, session: &mut Session, index: usize) -> Result<Step> {
        let Some(track) = session.queue().track(index).cloned() else {
            debug!(error = %PlaybackError::InvalidIndex(index), "Navigation skipped");
            return Ok(Step::done(PlayOutcome::Ignored));
        };

        if session.queue().current_index() == Some(index) && session.is_current(&track) {
            if session.is_loading() {
                return Ok(Step::done(PlayOutcome::Ignored));
            }
            if session.source_ready() {
                self.transport.seek(0.0);
                session.apply(SessionAction::Seeked(0.0));
                let record = self.start_playing(session)?;
                return Ok(Step::Done {
                    outcome: PlayOutcome::Restarted,
                    record,
                });
            }
        }

        let restore_index = session.queue().current_index();
        session.apply(SessionAction::QueuePositionChanged(index));
        Ok(Step::Load {
            track,
            epoch: session.epoch(),
            restore_index,
        })
    }

    /// Start the ready source; returns the track id when its play is new
    fn start_playing(&self, session: &mut Session) -> Result<Option<String>> {
        let track_id = session.current_track().map(|t| t.id.clone()).unwrap_or_default();

        if let Err(e) = self.transport.play() {
            let error = PlaybackError::Media {
                track_id,
                reason: e.to_string(),
            };
            warn!(error = %error, "Transport refused to play");
            session.apply(SessionAction::MediaFailed);
            session.report(&error);
            return Err(error);
        }

        session.apply(SessionAction::Playing);
        Ok(session.apply(SessionAction::PlayRecorded).then_some(track_id))
    }

    async fn run(&self, step: Step) -> Result<PlayOutcome> {
        match step {
            Step::Done { outcome, record } => {
                if let Some(track_id) = record {
                    self.record_play(&track_id).await;
                }
                Ok(outcome)
            }
            Step::Load {
                track,
                epoch,
                restore_index,
            } => self.start_track(track, epoch, restore_index).await,
        }
    }

    async fn start_track(
        &self,
        requested: Track,
        epoch: u64,
        restore_index: Option<usize>,
    ) -> Result<PlayOutcome> {
        let track_id = requested.id.clone();
        debug!(track_id = %track_id, epoch, "Starting track");

        let (track, source) = match self.resolve(requested).await {
            Ok(resolved) => resolved,
            Err(error) => {
                let mut session = self.session();
                if session.epoch() != epoch {
                    return Ok(PlayOutcome::Superseded);
                }
                warn!(error = %error, "Track resolution failed");
                self.pause_locked(&mut session);
                // The previous track stays current, so the queue follows it
                session.apply(SessionAction::QueueRealigned(restore_index));
                session.report(&error);
                return Err(error);
            }
        };

        {
            let mut session = self.session();
            if session.epoch() != epoch {
                debug!(track_id = %track_id, "Request superseded before load");
                return Ok(PlayOutcome::Superseded);
            }
            self.transport.pause();
            session.apply(SessionAction::TrackLoading(track));
        }

        let timeout = self.config.load_timeout();
        let loaded = tokio::time::timeout(timeout, self.transport.load(&source)).await;

        let record = {
            let mut session = self.session();
            if session.epoch() != epoch {
                debug!(track_id = %track_id, "Discarding stale load result");
                return Ok(PlayOutcome::Superseded);
            }

            let failure = match loaded {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(PlaybackError::Media {
                    track_id: track_id.clone(),
                    reason: e.to_string(),
                }),
                Err(_) => {
                    self.transport.release();
                    Some(PlaybackError::LoadTimeout {
                        track_id: track_id.clone(),
                        timeout,
                    })
                }
            };
            if let Some(error) = failure {
                warn!(error = %error, "Track load failed");
                session.apply(SessionAction::LoadFailed);
                session.report(&error);
                return Err(error);
            }

            session.apply(SessionAction::TrackReady);
            self.start_playing(&mut session)?
        };

        info!(track_id = %track_id, url = %source.url, "Playing track");
        if let Some(id) = record {
            self.record_play(&id).await;
        }
        Ok(PlayOutcome::Started)
    }

    /// Complete a track reference and produce its media source
    async fn resolve(&self, track: Track) -> Result<(Track, MediaSource)> {
        let track = if track.is_partial() {
            debug!(track_id = %track.id, "Fetching partial track from catalog");
            self.catalog
                .fetch_track(&track.id)
                .await
                .map_err(|e| resolution_error(&track.id, &e))?
        } else {
            track
        };

        let stored = track
            .stream_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| resolution_error(&track.id, &CatalogError::MissingStreamUrl(track.id.clone())))?;

        let url = self
            .catalog
            .resolve_stream_url(stored)
            .map_err(|e| resolution_error(&track.id, &e))?;

        if self.config.probe_streams {
            self.catalog
                .probe_stream(&url)
                .await
                .map_err(|e| resolution_error(&track.id, &e))?;
        }

        let duration_hint = (track.duration_seconds > 0.0).then_some(track.duration_seconds);
        Ok((track, MediaSource { url, duration_hint }))
    }

    async fn record_play(&self, track_id: &str) {
        if let Err(e) = self.catalog.record_play(track_id).await {
            warn!(track_id = %track_id, error = %e, "Failed to record play");
        }
    }
}

fn resolution_error(track_id: &str, error: &CatalogError) -> PlaybackError {
    PlaybackError::Resolution {
        track_id: track_id.to_string(),
        reason: error.to_string(),
    }
}
