//! Aqua Archive Catalog Client
//!
//! HTTP client for the song catalog API used by the mini-player.
//!
//! # Features
//!
//! - **Song lookup**: `GET /song/{id}`, bare or `{ success, data }` envelope
//! - **Play counting**: `POST /song/{id}/increment-view`
//! - **Stream checks**: `HEAD` probe of a stream before it is loaded
//! - **URL resolution**: relative stream paths joined to the API base
//!
//! [`CatalogClient`] implements [`aqua_playback::Catalog`].
//!
//! # Example
//!
//! ```ignore
//! use aqua_catalog_client::{CatalogClient, CatalogConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::new("https://api.example.com/api"))?;
//!
//!     let song = client.get_song("665f1c").await?;
//!     println!("{} ({} views)", song.title, song.views);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

// Re-export main types
pub use client::CatalogClient;
pub use error::{CatalogClientError, Result};
pub use types::{CatalogConfig, LyricResponse, PersonRef, SongResponse};
