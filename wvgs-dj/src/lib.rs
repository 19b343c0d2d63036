//! # WVGS Disc Jockey Library (wvgs-dj)
//!
//! Core playback sequencing engine for the WVGS lounge radio.
//!
//! **Purpose:** Load pre-encoded clip libraries, sequence an endless themed
//! program of songs, stories and transitions, and stream frames to a voice
//! transport under live pause/resume/stop control.
//!
//! **Architecture:** One background engine task per session. Command handlers
//! run on their own tasks and flip shared atomic flags that the engine
//! re-reads every pacing tick and every frame.

pub mod commands;
pub mod error;
pub mod library;
pub mod playback;
pub mod voice;

pub use error::{Error, Result};
pub use playback::state::SharedState;
