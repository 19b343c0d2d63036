//! Playback engine
//!
//! One engine run per session. The command surface joins the voice channel
//! and hands the engine an exclusive transport; the engine then paces the
//! program with a fixed tick, streams each clip frame by frame, and honors
//! the shared pause/stop flags between clips and between frames. Its only
//! terminal exit is a full stop (command, or transport failure), after which
//! it tears the session down and releases the transport.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wvgs_common::events::RadioEvent;
use wvgs_common::ids::{ChannelId, GuildId};

use crate::library::{Clip, ClipLibrary};
use crate::playback::sequencer::{slot_kind, Sequencer};
use crate::playback::state::SharedState;
use crate::voice::VoiceTransport;

/// Outcome of streaming one clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamOutcome {
    Completed,
    Aborted,
}

/// Outcome of waiting out a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PauseOutcome {
    Resumed,
    Stopped,
}

/// Streams the program for one session
pub struct RadioEngine {
    session_id: Uuid,
    library: Arc<ClipLibrary>,
    state: Arc<SharedState>,
    sequencer: Sequencer,
    tick: Duration,
}

impl RadioEngine {
    pub fn new(
        library: Arc<ClipLibrary>,
        state: Arc<SharedState>,
        sequencer: Sequencer,
        tick: Duration,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            library,
            state,
            sequencer,
            tick,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Run the session to completion
    ///
    /// The caller must already hold the idle-to-playing claim
    /// ([`SharedState::begin_session`]); the engine releases it on teardown.
    pub async fn run(
        mut self,
        mut transport: Box<dyn VoiceTransport>,
        guild: GuildId,
        channel: ChannelId,
    ) {
        info!(
            "Session {} starting in guild {} channel {}",
            self.session_id, guild, channel
        );
        if let Err(e) = transport.set_speaking(true).await {
            warn!("Session {}: speaking indicator failed: {}", self.session_id, e);
        }
        self.state.broadcast_event(RadioEvent::PlaybackStarted {
            session_id: self.session_id,
            guild_id: guild,
            channel_id: channel,
            timestamp: Utc::now(),
        });

        let mut index: u64 = 0;
        loop {
            // Pacing tick; also the between-clips stop point
            tokio::time::sleep(self.tick).await;
            if !self.state.is_playing() {
                debug!("Session {} stopped between clips", self.session_id);
                break;
            }

            let clip = self
                .sequencer
                .next_clip(index, &self.library, &self.state);
            debug!(
                "Session {} slot {}: {} ({} frames)",
                self.session_id,
                index,
                clip.name(),
                clip.frame_count()
            );
            self.state.broadcast_event(RadioEvent::ClipStarted {
                session_id: self.session_id,
                name: clip.name().to_string(),
                kind: slot_kind(index),
                program_index: index,
                timestamp: Utc::now(),
            });

            match self.stream_clip(&clip, transport.as_mut()).await {
                Ok(StreamOutcome::Completed) => {}
                Ok(StreamOutcome::Aborted) => {
                    debug!("Session {} aborted mid-clip", self.session_id);
                    break;
                }
                Err(e) => {
                    warn!(
                        "Session {}: transport failed mid-clip, stopping: {}",
                        self.session_id, e
                    );
                    break;
                }
            }

            index += 1;
        }

        self.teardown(transport).await;
    }

    /// Stream one clip's frames in order
    ///
    /// Checks the control flags before every frame: a cleared `playing`
    /// aborts immediately (frames already sent stay sent), a raised `paused`
    /// holds this exact frame until resume or stop.
    async fn stream_clip(
        &self,
        clip: &Clip,
        transport: &mut dyn VoiceTransport,
    ) -> crate::Result<StreamOutcome> {
        for frame in clip.frames() {
            if !self.state.is_playing() {
                return Ok(StreamOutcome::Aborted);
            }
            if self.state.is_paused() {
                if self.wait_while_paused().await == PauseOutcome::Stopped {
                    return Ok(StreamOutcome::Aborted);
                }
            }
            transport.send_frame(frame).await?;
        }
        Ok(StreamOutcome::Completed)
    }

    /// Park until the pause lifts or the session stops
    ///
    /// Wakes on every control write, with the tick as an upper bound, so
    /// both resume and stop land within one tick. The caller resumes at the
    /// frame it was holding; nothing is skipped or replayed.
    async fn wait_while_paused(&self) -> PauseOutcome {
        loop {
            if !self.state.is_playing() {
                return PauseOutcome::Stopped;
            }
            if !self.state.is_paused() {
                return PauseOutcome::Resumed;
            }
            self.state.control_changed(self.tick).await;
        }
    }

    /// Release the session: speaking off, transport dropped, flags clear
    ///
    /// The flags reset last, so the session claim stays held until the
    /// transport is actually released and a racing join cannot overlap
    /// two connections.
    async fn teardown(&self, mut transport: Box<dyn VoiceTransport>) {
        if let Err(e) = transport.set_speaking(false).await {
            warn!("Session {}: speaking indicator failed: {}", self.session_id, e);
        }
        if let Err(e) = transport.disconnect().await {
            warn!("Session {}: disconnect failed: {}", self.session_id, e);
        }
        self.state.reset();
        self.state.broadcast_event(RadioEvent::PlaybackStopped {
            session_id: self.session_id,
            timestamp: Utc::now(),
        });
        info!("Session {} ended", self.session_id);
    }
}
