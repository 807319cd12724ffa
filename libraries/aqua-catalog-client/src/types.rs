//! Types for catalog API requests and responses.

use aqua_playback::{LyricLine, Track};
use serde::{Deserialize, Serialize};

/// Configuration for connecting to the song catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the API (e.g., "https://api.example.com/api")
    pub base_url: String,
    /// Bearer token sent with every request (if signed in)
    pub access_token: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Create a config with just the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Attach an access token.
    pub fn with_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

// =============================================================================
// Song Types
// =============================================================================

/// Performer or composer reference.
///
/// Plain names in list responses, populated documents in detail responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
    Populated { nick_name: String },
    Name(String),
}

impl PersonRef {
    pub fn name(&self) -> &str {
        match self {
            PersonRef::Populated { nick_name } => nick_name,
            PersonRef::Name(name) => name,
        }
    }
}

/// Timed lyric line as stored by the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LyricResponse {
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub line: String,
}

/// Song document returned by `GET /song/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SongResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, alias = "audioUrl", alias = "songUrl")]
    pub url_song: Option<String>,
    #[serde(default)]
    pub url_cover: Option<String>,
    #[serde(default)]
    pub performers: Vec<PersonRef>,
    #[serde(default)]
    pub composers: Vec<PersonRef>,
    #[serde(default)]
    pub lyrics: Vec<LyricResponse>,
    #[serde(default)]
    pub views: u64,
}

impl SongResponse {
    /// Convert into a playback track descriptor.
    ///
    /// The stream URL is kept as stored; relative paths are resolved at play
    /// time.
    pub fn into_track(self) -> Track {
        Track {
            id: self.id,
            title: self.title,
            stream_url: self.url_song.filter(|url| !url.is_empty()),
            duration_seconds: self.duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0),
            performer_names: self.performers.iter().map(|p| p.name().to_string()).collect(),
            cover_url: self.url_cover.filter(|url| !url.is_empty()),
            lyrics: self
                .lyrics
                .into_iter()
                .map(|l| LyricLine {
                    start_time: l.start_time,
                    line: l.line,
                })
                .collect(),
        }
    }
}

/// Either a bare song or a `{ success, data }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SongEnvelope {
    Wrapped { data: SongResponse },
    Bare(SongResponse),
}

impl SongEnvelope {
    pub(crate) fn into_song(self) -> SongResponse {
        match self {
            SongEnvelope::Wrapped { data } | SongEnvelope::Bare(data) => data,
        }
    }
}
