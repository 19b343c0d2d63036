//! Configuration loading and audio root resolution

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming the clip library root
pub const AUDIO_ROOT_ENV: &str = "WVGS_AUDIO_ROOT";

/// Default pacing tick, milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Disc-jockey configuration file contents
///
/// Every field is optional; command-line arguments take precedence over all
/// of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DjConfig {
    /// Clip library root (holds Songs/, Stories/, Transitions/)
    pub audio_root: Option<PathBuf>,

    /// Transition link table file
    pub links_file: Option<PathBuf>,

    /// Pacing tick in milliseconds
    pub tick_ms: Option<u64>,
}

impl DjConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Load from the default per-OS location, or defaults when no file exists
    pub fn load_default() -> Result<Self> {
        match config_file_path() {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Audio root resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. WVGS_AUDIO_ROOT environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_audio_root(cli_arg: Option<&Path>, config: &DjConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(AUDIO_ROOT_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.audio_root {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_audio_root()
}

/// First existing configuration file, searched per platform
///
/// Linux checks `~/.config/wvgs/config.toml` then `/etc/wvgs/config.toml`;
/// macOS and Windows use the platform config directory.
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("wvgs").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/wvgs/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default clip library root
pub fn default_audio_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("wvgs"))
        .unwrap_or_else(|| PathBuf::from("./wvgs_data"))
}
