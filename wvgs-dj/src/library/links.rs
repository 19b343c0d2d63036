//! Transition to song link table
//!
//! Certain transitions introduce a specific song ("...and here is Blue
//! Moon"), so that song must be the next one played. The table maps
//! transition clip names to the song clip name that follows them; it is
//! loaded from a TOML `[links]` table and validated against the clip store
//! when the library is built.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Static mapping from transition clip names to forced follow-up songs
#[derive(Debug, Clone, Default)]
pub struct LinkTable {
    links: HashMap<String, String>,
}

#[derive(Deserialize)]
struct LinkFile {
    #[serde(default)]
    links: HashMap<String, String>,
}

impl LinkTable {
    pub fn new(links: HashMap<String, String>) -> Self {
        Self { links }
    }

    /// Load a link table from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a link table from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: LinkFile =
            toml::from_str(text).map_err(|e| Error::Config(format!("invalid link table: {}", e)))?;
        Ok(Self { links: file.links })
    }

    /// The song that must follow `transition`, if the transition is linked
    pub fn follow_up(&self, transition: &str) -> Option<&str> {
        self.links.get(transition).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
