//! Player configuration
use aqua_catalog_client::CatalogConfig;
use aqua_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "aqua-player.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub headless: HeadlessSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeadlessSettings {
    /// Playback clock resolution in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Seconds between status lines
    #[serde(default = "default_status_interval_secs")]
    pub status_interval_secs: u64,
}

impl Default for HeadlessSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            status_interval_secs: default_status_interval_secs(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `aqua-player.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. AQUA_CATALOG__BASE_URL)
        settings = settings.add_source(
            config::Environment::with_prefix("AQUA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.catalog.base_url.trim();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "catalog.base_url must start with http:// or https:// (got {:?})",
                self.catalog.base_url
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "catalog.timeout_secs must be positive".to_string(),
            ));
        }

        if self.playback.load_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "playback.load_timeout_ms must be positive".to_string(),
            ));
        }

        let volume = self.playback.default_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::Invalid(format!(
                "playback.default_volume must be between 0 and 1 (got {})",
                volume
            )));
        }

        if self.headless.tick_ms == 0 || self.headless.status_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "headless intervals must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_tick_ms() -> u64 {
    250
}

fn default_status_interval_secs() -> u64 {
    1
}
