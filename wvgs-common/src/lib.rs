//! # WVGS Common Library
//!
//! Shared code for the WVGS lounge-radio services including:
//! - Event types (RadioEvent enum)
//! - Typed chat-platform identifiers
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod ids;

pub use error::{Error, Result};
pub use ids::{ChannelId, GuildId, UserId};
