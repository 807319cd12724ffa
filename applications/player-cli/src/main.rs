/// Aqua Player - headless Aqua Archive mini-player
use anyhow::{bail, Context};
use aqua_catalog_client::CatalogClient;
use aqua_player::{config::PlayerConfig, transport::HeadlessTransport};
use aqua_playback::{PlayMode, PlaybackController, PlaybackEvent, PlaybackState, SessionSnapshot};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Consecutive idle status ticks before `play` exits
const IDLE_TICKS_BEFORE_EXIT: u32 = 2;

#[derive(Parser)]
#[command(name = "aqua-player")]
#[command(about = "Headless Aqua Archive mini-player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "AQUA_PLAYER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play songs from the catalog
    Play {
        /// Song IDs, in queue order
        #[arg(required = true)]
        song_ids: Vec<String>,

        /// Navigation mode (linear, repeat-one, shuffle)
        #[arg(short, long)]
        mode: Option<PlayMode>,

        /// Queue position to start from
        #[arg(short, long, default_value_t = 0)]
        start: usize,

        /// Initial volume (0.0-1.0)
        #[arg(short, long)]
        volume: Option<f32>,
    },
    /// Print a song's track descriptor as JSON
    Info {
        /// Song ID
        song_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "aqua_player=info,aqua_playback=info,aqua_catalog_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = PlayerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Play {
            song_ids,
            mode,
            start,
            volume,
        } => {
            play(config, &song_ids, mode, start, volume).await?;
        }
        Commands::Info { song_id } => {
            info(config, &song_id).await?;
        }
    }

    Ok(())
}

async fn info(config: PlayerConfig, song_id: &str) -> anyhow::Result<()> {
    let client = CatalogClient::new(config.catalog)?;
    let song = client
        .get_song(song_id)
        .await
        .with_context(|| format!("Failed to fetch song {}", song_id))?;

    println!("{}", serde_json::to_string_pretty(&song.into_track())?);
    Ok(())
}

async fn play(
    mut config: PlayerConfig,
    song_ids: &[String],
    mode: Option<PlayMode>,
    start: usize,
    volume: Option<f32>,
) -> anyhow::Result<()> {
    if start >= song_ids.len() {
        bail!(
            "--start {} is out of range for a queue of {} songs",
            start,
            song_ids.len()
        );
    }
    if let Some(mode) = mode {
        config.playback.mode = mode;
    }

    let client = Arc::new(CatalogClient::new(config.catalog.clone())?);

    let mut queue = Vec::with_capacity(song_ids.len());
    for id in song_ids {
        let track = client
            .get_track(id)
            .await
            .with_context(|| format!("Failed to fetch song {}", id))?;
        queue.push(track);
    }
    info!("Fetched {} songs", queue.len());

    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("AquaPlayer/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build stream client")?;
    let (transport, transport_events) =
        HeadlessTransport::new(http, Duration::from_millis(config.headless.tick_ms));

    let controller = Arc::new(PlaybackController::new(
        config.playback.clone(),
        Arc::new(transport),
        client,
    ));
    let pump = controller.spawn_event_pump(transport_events);

    if let Some(level) = volume {
        controller.set_volume(level);
    }

    let first = queue[start].clone();
    if let Err(e) = controller.play_or_toggle(first, Some(queue)).await {
        warn!("Playback did not start: {}", e);
    }

    let mut status = tokio::time::interval(Duration::from_secs(config.headless.status_interval_secs));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut idle_ticks = 0;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping playback");
                break;
            }
            _ = status.tick() => {
                for event in controller.drain_events() {
                    log_event(&event);
                }

                let snapshot = controller.snapshot();
                log_status(&snapshot);

                if snapshot.state == PlaybackState::Idle {
                    idle_ticks += 1;
                    if idle_ticks >= IDLE_TICKS_BEFORE_EXIT {
                        info!("Playback finished");
                        break;
                    }
                } else {
                    idle_ticks = 0;
                }
            }
        }
    }

    controller.reset_session();
    pump.abort();
    Ok(())
}

fn log_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::Error { message, .. } => warn!("{}", message),
        PlaybackEvent::TrackChanged { track_id, .. } => info!(track_id = %track_id, "Now playing"),
        other => debug!(event = ?other, "Playback event"),
    }
}

fn log_status(snapshot: &SessionSnapshot) {
    let Some(track) = snapshot.current_track.as_ref() else {
        info!("Nothing playing");
        return;
    };

    info!(
        state = ?snapshot.state,
        mode = %snapshot.mode,
        volume = snapshot.volume,
        "{} - {} [{} / {}]{}",
        track.performers_label(),
        track.title,
        snapshot.elapsed_label(),
        snapshot.duration_label(),
        snapshot
            .lyric_line()
            .map(|line| format!(" \"{}\"", line))
            .unwrap_or_default(),
    );
}
