//! Command surface
//!
//! The four user-facing operations, invoked by the bot's message-routing
//! layer from whatever task handles the inbound event. Every operation
//! first verifies the invoker is actually in a voice channel of the guild;
//! the router turns the resulting errors into channel notices via
//! [`user_notice`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};
use wvgs_common::events::RadioEvent;
use wvgs_common::ids::{ChannelId, GuildId, UserId};

use crate::error::{Error, Result};
use crate::library::ClipLibrary;
use crate::playback::engine::RadioEngine;
use crate::playback::sequencer::Sequencer;
use crate::playback::state::SharedState;
use crate::voice::{VoiceDirectory, VoiceGateway};

/// Notice shown when the invoker is not in a voice channel
pub const NOT_IN_VOICE_NOTICE: &str = "You must be in a voice channel to run this command";

/// Notice shown when the voice channel cannot be joined
pub const COULD_NOT_JOIN_NOTICE: &str = "Could not join the channel...is it full?";

/// User-visible notice for a command failure, when one exists
pub fn user_notice(error: &Error) -> Option<&'static str> {
    match error {
        Error::UserNotPresent(_) => Some(NOT_IN_VOICE_NOTICE),
        Error::Join(_) => Some(COULD_NOT_JOIN_NOTICE),
        _ => None,
    }
}

/// Context of one command invocation
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    /// Guild the command came from
    pub guild: GuildId,
    /// Text channel the command was typed in
    pub channel: ChannelId,
    /// Invoking user
    pub user: UserId,
}

/// The disc jockey's command surface
///
/// All four operations are idempotent under repeated calls and safe to
/// invoke concurrently with the running engine: they only flip the shared
/// control flags the engine re-reads every tick and frame.
pub struct DjCommands {
    library: Arc<ClipLibrary>,
    state: Arc<SharedState>,
    gateway: Arc<dyn VoiceGateway>,
    directory: Arc<dyn VoiceDirectory>,
    tick: Duration,
}

impl DjCommands {
    pub fn new(
        library: Arc<ClipLibrary>,
        state: Arc<SharedState>,
        gateway: Arc<dyn VoiceGateway>,
        directory: Arc<dyn VoiceDirectory>,
        tick: Duration,
    ) -> Self {
        Self {
            library,
            state,
            gateway,
            directory,
            tick,
        }
    }

    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    /// Start a session in the caller's voice channel
    ///
    /// No-op when a session is already live (playing, or paused which keeps
    /// the session live).
    pub async fn join(&self, ctx: CommandContext) -> Result<()> {
        let voice_channel = self.require_presence(ctx)?;
        if self.state.is_playing() || self.state.is_paused() {
            debug!("Join ignored, session already active");
            return Ok(());
        }

        let transport = self.gateway.join(ctx.guild, voice_channel).await?;
        if !self.state.begin_session() {
            // Lost the claim to a concurrent join; release the spare connection
            let mut transport = transport;
            let _ = transport.disconnect().await;
            debug!("Join lost the session claim, disconnecting spare transport");
            return Ok(());
        }

        let engine = RadioEngine::new(
            Arc::clone(&self.library),
            Arc::clone(&self.state),
            Sequencer::random(),
            self.tick,
        );
        info!(
            "Join accepted: session {} for user {} in channel {}",
            engine.session_id(),
            ctx.user,
            voice_channel
        );
        tokio::spawn(engine.run(transport, ctx.guild, voice_channel));
        Ok(())
    }

    /// Stop the active session
    ///
    /// The engine observes the cleared flag within one tick or one in-flight
    /// frame and tears down, paused or not. No-op when nothing is playing.
    pub async fn stop(&self, ctx: CommandContext) -> Result<()> {
        self.require_presence(ctx)?;
        if !self.state.is_playing() {
            debug!("Stop ignored, nothing playing");
            return Ok(());
        }

        info!("Stop requested by user {}", ctx.user);
        self.state.set_playing(false);
        self.state.set_paused(false);
        Ok(())
    }

    /// Hold frame streaming mid-clip
    ///
    /// No-op unless playing and not already paused.
    pub async fn pause(&self, ctx: CommandContext) -> Result<()> {
        self.require_presence(ctx)?;
        if !self.state.is_playing() || self.state.is_paused() {
            debug!("Pause ignored");
            return Ok(());
        }

        info!("Pause requested by user {}", ctx.user);
        self.state.set_paused(true);
        self.state.broadcast_event(RadioEvent::PlaybackPaused {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Resume a paused session at the exact frame it stopped on
    ///
    /// No-op unless paused.
    pub async fn resume(&self, ctx: CommandContext) -> Result<()> {
        self.require_presence(ctx)?;
        if !self.state.is_paused() {
            debug!("Resume ignored, not paused");
            return Ok(());
        }

        info!("Resume requested by user {}", ctx.user);
        self.state.set_paused(false);
        self.state.broadcast_event(RadioEvent::PlaybackResumed {
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn require_presence(&self, ctx: CommandContext) -> Result<ChannelId> {
        self.directory
            .voice_channel_of(ctx.guild, ctx.user)
            .ok_or(Error::UserNotPresent(ctx.user))
    }
}
