//! Shared fakes for controller tests

#![allow(dead_code)]

use aqua_playback::{
    Catalog, CatalogError, MediaSource, PlaybackConfig, PlaybackController, Track, Transport,
    TransportError,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CATALOG_BASE: &str = "https://catalog.test";

// ===== Tracks =====

pub fn url(id: &str) -> String {
    format!("https://cdn.test/{}.mp3", id)
}

/// Fully resolved track, 180 seconds long
pub fn track(id: &str) -> Track {
    Track {
        title: format!("Song {}", id),
        stream_url: Some(url(id)),
        duration_seconds: 180.0,
        performer_names: vec!["Performer".to_string()],
        ..Track::partial(id)
    }
}

pub fn tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

// ===== Transport =====

/// How the fake transport answers a load for a given URL
#[derive(Debug, Clone)]
pub enum LoadBehavior {
    Ready,
    Delay(Duration),
    Fail(String),
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    Release,
}

#[derive(Default)]
struct TransportState {
    behaviors: HashMap<String, LoadBehavior>,
    calls: Vec<Call>,
    generation: u64,
    loaded: Option<String>,
    playing: bool,
    volume: f32,
    refuse_play: bool,
}

/// Records every call; loads succeed unless told otherwise
#[derive(Default)]
pub struct FakeTransport {
    state: Mutex<TransportState>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_behavior(&self, url: &str, behavior: LoadBehavior) {
        self.state.lock().unwrap().behaviors.insert(url.to_string(), behavior);
    }

    pub fn refuse_play(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_play = refuse;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Load(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn loaded(&self) -> Option<String> {
        self.state.lock().unwrap().loaded.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn load(&self, source: &MediaSource) -> Result<(), TransportError> {
        let (behavior, generation) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call::Load(source.url.clone()));
            state.generation += 1;
            state.loaded = None;
            state.playing = false;
            let behavior = state
                .behaviors
                .get(&source.url)
                .cloned()
                .unwrap_or(LoadBehavior::Ready);
            (behavior, state.generation)
        };

        match behavior {
            LoadBehavior::Ready => {}
            LoadBehavior::Delay(delay) => tokio::time::sleep(delay).await,
            LoadBehavior::Fail(reason) => return Err(TransportError::Media(reason)),
            LoadBehavior::Hang => std::future::pending::<()>().await,
        }

        let mut state = self.state.lock().unwrap();
        if state.generation != generation {
            return Err(TransportError::Released);
        }
        state.loaded = Some(source.url.clone());
        Ok(())
    }

    fn play(&self) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Play);
        if state.refuse_play {
            return Err(TransportError::Unsupported("autoplay blocked".to_string()));
        }
        if state.loaded.is_some() {
            state.playing = true;
        }
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Pause);
        state.playing = false;
    }

    fn seek(&self, seconds: f64) {
        self.record(Call::Seek(seconds));
    }

    fn set_volume(&self, level: f32) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SetVolume(level));
        state.volume = level;
    }

    fn release(&self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Release);
        state.generation += 1;
        state.loaded = None;
        state.playing = false;
    }
}

// ===== Catalog =====

/// In-memory catalog resolving relative paths against [`CATALOG_BASE`]
#[derive(Default)]
pub struct FakeCatalog {
    songs: Mutex<HashMap<String, Track>>,
    unreachable: Mutex<HashSet<String>>,
    plays: Mutex<Vec<String>>,
    fail_record: Mutex<bool>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, track: Track) {
        self.songs.lock().unwrap().insert(track.id.clone(), track);
    }

    /// Make the probe of `url` fail
    pub fn mark_unreachable(&self, url: &str) {
        self.unreachable.lock().unwrap().insert(url.to_string());
    }

    pub fn fail_record(&self) {
        *self.fail_record.lock().unwrap() = true;
    }

    pub fn plays(&self) -> Vec<String> {
        self.plays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_track(&self, id: &str) -> Result<Track, CatalogError> {
        self.songs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn resolve_stream_url(&self, stream_url: &str) -> Result<String, CatalogError> {
        if stream_url.starts_with("http://") || stream_url.starts_with("https://") {
            Ok(stream_url.to_string())
        } else {
            Ok(format!("{}/{}", CATALOG_BASE, stream_url.trim_start_matches('/')))
        }
    }

    async fn probe_stream(&self, url: &str) -> Result<(), CatalogError> {
        if self.unreachable.lock().unwrap().contains(url) {
            return Err(CatalogError::Unavailable(format!("HEAD {} failed", url)));
        }
        Ok(())
    }

    async fn record_play(&self, id: &str) -> Result<(), CatalogError> {
        if *self.fail_record.lock().unwrap() {
            return Err(CatalogError::Unavailable("counter offline".to_string()));
        }
        self.plays.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

// ===== Controller =====

pub struct Harness {
    pub controller: Arc<PlaybackController>,
    pub transport: Arc<FakeTransport>,
    pub catalog: Arc<FakeCatalog>,
}

pub fn test_config() -> PlaybackConfig {
    PlaybackConfig {
        shuffle_seed: Some(1),
        ..PlaybackConfig::default()
    }
}

pub fn harness() -> Harness {
    harness_with(test_config())
}

pub fn harness_with(config: PlaybackConfig) -> Harness {
    let transport = Arc::new(FakeTransport::new());
    let catalog = Arc::new(FakeCatalog::new());
    let controller = Arc::new(PlaybackController::new(
        config,
        transport.clone(),
        catalog.clone(),
    ));
    Harness {
        controller,
        transport,
        catalog,
    }
}
