//! Aqua Player
//!
//! Headless front end for the Aqua Archive mini-player: configuration
//! loading and a [`transport::HeadlessTransport`] that stands in for an
//! audio device. The `aqua-player` binary wires these to a
//! [`aqua_playback::PlaybackController`] backed by the catalog HTTP client.

pub mod config;
pub mod transport;
