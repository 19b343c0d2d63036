//! Event types for the WVGS event system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::{ChannelId, GuildId};

/// Clip category in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Song,
    Story,
    Transition,
}

impl std::fmt::Display for ClipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipKind::Song => write!(f, "song"),
            ClipKind::Story => write!(f, "story"),
            ClipKind::Transition => write!(f, "transition"),
        }
    }
}

/// Program slot category
///
/// What the program policy schedules at a given slot index. Unlike
/// [`ClipKind`] this includes the session opener, which belongs to no
/// library category and plays exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Opening,
    Transition,
    Story,
    Song,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotKind::Opening => write!(f, "opening"),
            SlotKind::Transition => write!(f, "transition"),
            SlotKind::Story => write!(f, "story"),
            SlotKind::Song => write!(f, "song"),
        }
    }
}

/// WVGS event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RadioEvent {
    /// A session started streaming to a voice channel
    PlaybackStarted {
        session_id: Uuid,
        guild_id: GuildId,
        channel_id: ChannelId,
        timestamp: DateTime<Utc>,
    },

    /// The engine began streaming a clip
    ClipStarted {
        session_id: Uuid,
        name: String,
        kind: SlotKind,
        program_index: u64,
        timestamp: DateTime<Utc>,
    },

    /// A transition scheduled its linked song for the next song slot
    FollowUpScheduled {
        transition: String,
        song: String,
        timestamp: DateTime<Utc>,
    },

    /// Playback paused mid-clip
    PlaybackPaused {
        timestamp: DateTime<Utc>,
    },

    /// Playback resumed from the paused frame
    PlaybackResumed {
        timestamp: DateTime<Utc>,
    },

    /// The session tore down (stop command or transport failure)
    PlaybackStopped {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}
