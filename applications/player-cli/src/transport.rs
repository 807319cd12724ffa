//! Headless transport
//!
//! A [`Transport`] without an audio device. Loading checks that the stream
//! answers with a success status, then a clock task advances the position
//! while "playing" and reports progress and the end of the track.

use aqua_playback::{MediaSource, Transport, TransportError, TransportEvent};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Default)]
struct Clock {
    /// Bumped by every load and release; a load only lands on its own
    generation: u64,
    loaded: Option<LoadedSource>,
    playing: bool,
    position: f64,
    volume: f32,
}

#[derive(Debug, Clone)]
struct LoadedSource {
    url: String,
    /// Seconds, 0 when unknown
    duration: f64,
}

impl Clock {
    /// Advance by `step` seconds while playing
    fn advance(&mut self, step: f64) -> Vec<TransportEvent> {
        if !self.playing {
            return Vec::new();
        }
        let Some(duration) = self.loaded.as_ref().map(|s| s.duration) else {
            return Vec::new();
        };

        self.position += step;
        if duration > 0.0 && self.position >= duration {
            self.position = duration;
            self.playing = false;
            return vec![TransportEvent::Progress(duration), TransportEvent::Ended];
        }
        vec![TransportEvent::Progress(self.position)]
    }
}

/// Transport driven by a wall-clock ticker
pub struct HeadlessTransport {
    http: Client,
    clock: Arc<Mutex<Clock>>,
    ticker: JoinHandle<()>,
}

impl HeadlessTransport {
    /// Create the transport and the receiver for its notifications
    ///
    /// Must be called inside a tokio runtime; the clock task lives until the
    /// transport is dropped.
    pub fn new(http: Client, tick: Duration) -> (Self, mpsc::Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let clock = Arc::new(Mutex::new(Clock {
            volume: 1.0,
            ..Clock::default()
        }));
        let ticker = tokio::spawn(run_clock(Arc::clone(&clock), tx, tick));

        (
            Self {
                http,
                clock,
                ticker,
            },
            rx,
        )
    }

    /// Playback position in seconds
    pub fn position(&self) -> f64 {
        self.clock().position
    }

    pub fn is_playing(&self) -> bool {
        self.clock().playing
    }

    /// URL of the loaded source
    pub fn loaded_url(&self) -> Option<String> {
        self.clock().loaded.as_ref().map(|s| s.url.clone())
    }

    pub fn volume(&self) -> f32 {
        self.clock().volume
    }

    fn clock(&self) -> MutexGuard<'_, Clock> {
        lock(&self.clock)
    }
}

impl Drop for HeadlessTransport {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

#[async_trait]
impl Transport for HeadlessTransport {
    async fn load(&self, source: &MediaSource) -> Result<(), TransportError> {
        let generation = {
            let mut clock = self.clock();
            clock.generation += 1;
            clock.loaded = None;
            clock.playing = false;
            clock.position = 0.0;
            clock.generation
        };
        debug!(url = %source.url, "Loading stream");

        let response = self
            .http
            .get(&source.url)
            .send()
            .await
            .map_err(|e| TransportError::Media(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Media(format!("stream returned {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if content_type.starts_with("text/html") {
            return Err(TransportError::Unsupported(content_type));
        }
        // Headers are enough; the body is never decoded
        drop(response);

        let mut clock = self.clock();
        if clock.generation != generation {
            return Err(TransportError::Released);
        }
        clock.loaded = Some(LoadedSource {
            url: source.url.clone(),
            duration: source.duration_hint.unwrap_or(0.0),
        });
        Ok(())
    }

    fn play(&self) -> Result<(), TransportError> {
        let mut clock = self.clock();
        if clock.loaded.is_some() {
            clock.playing = true;
        }
        Ok(())
    }

    fn pause(&self) {
        self.clock().playing = false;
    }

    fn seek(&self, seconds: f64) {
        let mut clock = self.clock();
        let duration = clock.loaded.as_ref().map_or(0.0, |s| s.duration);
        clock.position = if duration > 0.0 {
            seconds.clamp(0.0, duration)
        } else {
            seconds.max(0.0)
        };
    }

    fn set_volume(&self, level: f32) {
        debug!(level, "Headless volume change");
        self.clock().volume = level;
    }

    fn release(&self) {
        let mut clock = self.clock();
        clock.generation += 1;
        clock.loaded = None;
        clock.playing = false;
        clock.position = 0.0;
    }
}

async fn run_clock(clock: Arc<Mutex<Clock>>, events: mpsc::Sender<TransportEvent>, tick: Duration) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let step = tick.as_secs_f64();

    loop {
        interval.tick().await;
        let pending = lock(&clock).advance(step);
        for event in pending {
            trace!(?event, "Clock event");
            if events.send(event).await.is_err() {
                debug!("Transport event receiver dropped, stopping clock");
                return;
            }
        }
    }
}

fn lock(clock: &Mutex<Clock>) -> MutexGuard<'_, Clock> {
    clock.lock().unwrap_or_else(PoisonError::into_inner)
}
