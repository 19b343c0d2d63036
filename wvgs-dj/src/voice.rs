//! Voice transport contracts
//!
//! The chat platform owns connection and session management; the engine and
//! command surface consume it through these seams. A production adapter
//! wraps the platform SDK; tests and the audition binary plug in local
//! implementations.

use async_trait::async_trait;
use wvgs_common::ids::{ChannelId, GuildId, UserId};

use crate::error::Result;

/// An exclusive, connected voice stream for one session
#[async_trait]
pub trait VoiceTransport: Send {
    /// Toggle the speaking indicator on the voice connection
    async fn set_speaking(&mut self, speaking: bool) -> Result<()>;

    /// Hand one pre-encoded frame to the platform sink
    ///
    /// May block under backpressure; that blocking is what paces
    /// transmission to real time.
    async fn send_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Release the voice connection
    async fn disconnect(&mut self) -> Result<()>;
}

/// Joins voice destinations
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Join a voice channel, yielding an exclusive transport for the session
    ///
    /// Fails with [`crate::Error::Join`] when the destination is unreachable
    /// or full.
    async fn join(&self, guild: GuildId, channel: ChannelId) -> Result<Box<dyn VoiceTransport>>;
}

/// Member-list lookup backing the presence check on every command
pub trait VoiceDirectory: Send + Sync {
    /// The voice channel `user` currently occupies in `guild`, if any
    fn voice_channel_of(&self, guild: GuildId, user: UserId) -> Option<ChannelId>;
}

/// Transport that drops every frame; used by library auditions
#[derive(Debug, Default)]
pub struct DiscardTransport {
    frames_sent: u64,
}

impl DiscardTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

#[async_trait]
impl VoiceTransport for DiscardTransport {
    async fn set_speaking(&mut self, _speaking: bool) -> Result<()> {
        Ok(())
    }

    async fn send_frame(&mut self, _frame: &[u8]) -> Result<()> {
        self.frames_sent += 1;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}
