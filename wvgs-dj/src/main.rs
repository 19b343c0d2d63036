//! WVGS Disc Jockey (wvgs-dj) - Main entry point
//!
//! Validates a clip library and, on request, auditions the program through a
//! discarding transport. The chat-platform adapter owns the real bot wiring;
//! this binary exercises everything below that seam: codec, library, link
//! table, sequencing engine and events.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wvgs_common::config::{self, DjConfig};
use wvgs_common::events::RadioEvent;
use wvgs_common::ids::{ChannelId, GuildId};
use wvgs_dj::library::{ClipKind, ClipLibrary, LinkTable};
use wvgs_dj::playback::{RadioEngine, Sequencer, SharedState};
use wvgs_dj::voice::DiscardTransport;

/// Command-line arguments for wvgs-dj
#[derive(Parser, Debug)]
#[command(name = "wvgs-dj")]
#[command(about = "Lounge radio disc jockey for WVGS")]
#[command(version)]
struct Args {
    /// Root folder containing the clip library (Songs/, Stories/, Transitions/)
    #[arg(short, long)]
    audio_root: Option<PathBuf>,

    /// Link table file (defaults to links.toml inside the audio root)
    #[arg(short, long)]
    links: Option<PathBuf>,

    /// Pacing tick in milliseconds
    #[arg(long, env = "WVGS_TICK_MS")]
    tick_ms: Option<u64>,

    /// Audition this many program slots through a discarding transport
    #[arg(long)]
    audition: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wvgs_dj=debug,wvgs_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let file_config = DjConfig::load_default().context("Failed to load config file")?;
    let audio_root = config::resolve_audio_root(args.audio_root.as_deref(), &file_config);
    let tick_ms = args
        .tick_ms
        .or(file_config.tick_ms)
        .unwrap_or(config::DEFAULT_TICK_MS);
    info!("Audio root: {}", audio_root.display());

    let links_path = args
        .links
        .or(file_config.links_file)
        .unwrap_or_else(|| audio_root.join("links.toml"));
    let links = if links_path.exists() {
        LinkTable::load(&links_path).context("Failed to load link table")?
    } else {
        info!(
            "No link table at {}, transitions will not force songs",
            links_path.display()
        );
        LinkTable::default()
    };

    let library = Arc::new(
        ClipLibrary::load(&audio_root, links).context("Failed to load clip library")?,
    );
    for kind in [ClipKind::Song, ClipKind::Story, ClipKind::Transition] {
        info!("{}s: {}", kind, library.list(kind).join(", "));
    }
    info!("Library OK");

    match args.audition {
        Some(slots) => audition(library, slots, Duration::from_millis(tick_ms)).await,
        None => Ok(()),
    }
}

/// Dry-run the program: stream `slots` clips into a discarding transport,
/// logging each event as a JSON line
async fn audition(library: Arc<ClipLibrary>, slots: u64, tick: Duration) -> Result<()> {
    info!("Auditioning {} program slots (tick {:?})", slots, tick);

    let state = Arc::new(SharedState::new());
    let mut events = state.subscribe_events();

    if !state.begin_session() {
        anyhow::bail!("Session claim failed on a fresh state");
    }
    let engine = RadioEngine::new(
        Arc::clone(&library),
        Arc::clone(&state),
        Sequencer::random(),
        tick,
    );
    let handle = tokio::spawn(engine.run(
        Box::new(DiscardTransport::new()),
        GuildId(0),
        ChannelId(0),
    ));

    // Ctrl-C / SIGTERM end the audition early through the normal stop path
    tokio::spawn({
        let state = Arc::clone(&state);
        async move {
            shutdown_signal().await;
            state.set_playing(false);
        }
    });

    let mut started = 0u64;
    loop {
        match events.recv().await {
            Ok(event) => {
                info!("{}", serde_json::to_string(&event)?);
                match event {
                    RadioEvent::ClipStarted { .. } => {
                        started += 1;
                        if started >= slots {
                            state.set_playing(false);
                        }
                    }
                    RadioEvent::PlaybackStopped { .. } => break,
                    _ => {}
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                info!("Event stream lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    handle.await.context("Engine task panicked")?;
    info!("Audition complete: {} clips", started);
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping audition");
        },
        _ = terminate => {
            info!("Received terminate signal, stopping audition");
        },
    }
}
