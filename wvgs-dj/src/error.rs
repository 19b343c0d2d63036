//! Error types for wvgs-dj
//!
//! Defines service-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;
use wvgs_common::ids::UserId;

/// Main error type for the wvgs-dj service
#[derive(Error, Debug)]
pub enum Error {
    /// Clip asset missing or malformed; fatal at library construction
    #[error("Clip load error in {name}: {reason}")]
    ClipLoad { name: String, reason: String },

    /// Frame stream violates the length-prefixed format
    #[error("Frame codec error: {0}")]
    Codec(String),

    /// Voice destination unreachable or full
    #[error("Could not join voice channel: {0}")]
    Join(String),

    /// Command invoker is not in a voice channel of the guild
    #[error("User {0} is not in a voice channel")]
    UserNotPresent(UserId),

    /// Frame sink failed mid-stream; the engine treats this as a stop
    #[error("Voice transport error: {0}")]
    Transport(String),

    /// Configuration or link-table validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using wvgs-dj Error
pub type Result<T> = std::result::Result<T, Error>;
