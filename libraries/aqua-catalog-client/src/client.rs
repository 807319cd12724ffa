//! Song catalog client.

use crate::error::{CatalogClientError, Result};
use crate::types::{CatalogConfig, SongEnvelope, SongResponse};
use aqua_playback::{Catalog, CatalogError, Track};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client for the song catalog API.
///
/// Implements [`Catalog`] so it can back a
/// [`aqua_playback::PlaybackController`] directly.
///
/// # Example
///
/// ```ignore
/// use aqua_catalog_client::{CatalogClient, CatalogConfig};
///
/// let client = CatalogClient::new(CatalogConfig::new("https://api.example.com/api"))?;
/// let track = client.get_track("665f1c").await?;
/// println!("{} by {}", track.title, track.performers_label());
/// ```
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        // Validate URL
        if config.base_url.is_empty() {
            return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let trimmed = config.base_url.trim_end_matches('/');
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(CatalogClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        // Trailing slash so relative joins land under the base path
        let base_url = Url::parse(&format!("{}/", trimmed))
            .map_err(|e| CatalogClientError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("AquaPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token,
        })
    }

    /// Base URL without the trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Fetch a song document.
    pub async fn get_song(&self, id: &str) -> Result<SongResponse> {
        let url = self.endpoint(&["song", id])?;
        debug!(url = %url, "Fetching song");

        let response = self.send(self.request(Method::GET, url)).await?;
        let status = response.status();

        if status.is_success() {
            let envelope: SongEnvelope = response.json().await.map_err(|e| {
                CatalogClientError::ParseError(format!("Failed to parse song response: {}", e))
            })?;
            Ok(envelope.into_song())
        } else if status == StatusCode::NOT_FOUND {
            Err(CatalogClientError::NotFound(format!("song {}", id)))
        } else {
            Err(server_error(response).await)
        }
    }

    /// Fetch a song as a playable track.
    pub async fn get_track(&self, id: &str) -> Result<Track> {
        let track = self.get_song(id).await?.into_track();
        if track.is_partial() {
            return Err(CatalogClientError::MissingStreamUrl(id.to_string()));
        }
        debug!(track_id = %track.id, title = %track.title, "Fetched track");
        Ok(track)
    }

    /// Count a play; returns the new view count.
    pub async fn increment_view(&self, id: &str) -> Result<u64> {
        let url = self.endpoint(&["song", id, "increment-view"])?;
        debug!(url = %url, "Incrementing view count");

        let response = self.send(self.request(Method::POST, url)).await?;
        let status = response.status();

        if status.is_success() {
            let envelope: SongEnvelope = response.json().await.map_err(|e| {
                CatalogClientError::ParseError(format!("Failed to parse view response: {}", e))
            })?;
            let views = envelope.into_song().views;
            info!(song_id = %id, views, "Play recorded");
            Ok(views)
        } else if status == StatusCode::NOT_FOUND {
            Err(CatalogClientError::NotFound(format!("song {}", id)))
        } else {
            Err(server_error(response).await)
        }
    }

    /// Check that a stream URL answers a `HEAD` request.
    pub async fn probe(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).map_err(|e| CatalogClientError::InvalidUrl(format!("{}: {}", url, e)))?;
        debug!(url = %url, "Probing stream");

        let response = self.send(self.http.head(url.clone())).await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status == StatusCode::NOT_FOUND {
            Err(CatalogClientError::NotFound(url.to_string()))
        } else {
            Err(CatalogClientError::ServerError {
                status: status.as_u16(),
                message: format!("stream probe failed for {}", url),
            })
        }
    }

    /// Turn a stored stream location into an absolute URL.
    ///
    /// Absolute http(s) URLs pass through; anything else is joined to the
    /// base URL.
    pub fn resolve_url(&self, stream_url: &str) -> Result<String> {
        let stream_url = stream_url.trim();
        if stream_url.is_empty() {
            return Err(CatalogClientError::InvalidUrl("stream URL is empty".into()));
        }

        match Url::parse(stream_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url.to_string()),
            Ok(url) => Err(CatalogClientError::InvalidUrl(format!(
                "unsupported stream scheme: {}",
                url.scheme()
            ))),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(stream_url.trim_start_matches('/'))
                .map(String::from)
                .map_err(|e| CatalogClientError::InvalidUrl(format!("{}: {}", stream_url, e))),
            Err(e) => Err(CatalogClientError::InvalidUrl(format!("{}: {}", stream_url, e))),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(CatalogClientError::from_send)
    }
}

async fn server_error(response: Response) -> CatalogClientError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    CatalogClientError::ServerError { status, message }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn fetch_track(&self, id: &str) -> std::result::Result<Track, CatalogError> {
        Ok(self.get_track(id).await?)
    }

    fn resolve_stream_url(&self, stream_url: &str) -> std::result::Result<String, CatalogError> {
        Ok(self.resolve_url(stream_url)?)
    }

    async fn probe_stream(&self, url: &str) -> std::result::Result<(), CatalogError> {
        Ok(self.probe(url).await?)
    }

    async fn record_play(&self, id: &str) -> std::result::Result<(), CatalogError> {
        self.increment_view(id).await?;
        Ok(())
    }
}
