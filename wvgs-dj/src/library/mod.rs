//! Clip library: categorized clip store plus link table
//!
//! A library root holds `Songs/`, `Stories/` and `Transitions/` directories
//! of length-prefixed `.dca` clip files. `Transitions/Opening.dca` is the
//! session opener; it is pulled out of the transition pool at load. The
//! whole library is decoded eagerly at startup and any missing or malformed
//! asset aborts construction: the program policy draws from every pool, so
//! an incomplete store is unusable.

pub mod codec;
pub mod links;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

pub use links::LinkTable;
pub use wvgs_common::events::ClipKind;

use crate::error::{Error, Result};

/// File extension of clip assets
pub const CLIP_EXTENSION: &str = "dca";

/// Name of the session opener inside `Transitions/`
pub const OPENING_CLIP: &str = "Opening.dca";

/// One playable unit: a named, ordered sequence of pre-encoded frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    name: String,
    frames: Vec<Vec<u8>>,
}

impl Clip {
    pub fn new(name: impl Into<String>, frames: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            frames,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frames in playback order
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Read-only clip store, built once at startup and shared by reference
#[derive(Debug)]
pub struct ClipLibrary {
    songs: Vec<Arc<Clip>>,
    stories: Vec<Arc<Clip>>,
    transitions: Vec<Arc<Clip>>,
    opening: Arc<Clip>,
    links: LinkTable,
}

impl ClipLibrary {
    /// Load a library root from disk
    pub fn load(root: &Path, links: LinkTable) -> Result<Self> {
        let songs = load_clip_dir(&root.join("Songs"))?;
        let stories = load_clip_dir(&root.join("Stories"))?;
        let mut transitions = load_clip_dir(&root.join("Transitions"))?;

        let opening_pos = transitions
            .iter()
            .position(|clip| clip.name() == OPENING_CLIP)
            .ok_or_else(|| Error::ClipLoad {
                name: OPENING_CLIP.to_string(),
                reason: "missing from Transitions".to_string(),
            })?;
        let opening = transitions.remove(opening_pos);

        let library = Self::from_parts(songs, stories, transitions, opening, links)?;
        info!(
            "Loaded clip library: {} songs, {} stories, {} transitions, {} links",
            library.songs.len(),
            library.stories.len(),
            library.transitions.len(),
            library.links.len(),
        );
        Ok(library)
    }

    /// Build a library from already-decoded clips
    ///
    /// Validates that every pool the program policy draws from is non-empty
    /// and that the link table only references clips that exist.
    pub fn from_parts(
        songs: Vec<Clip>,
        stories: Vec<Clip>,
        transitions: Vec<Clip>,
        opening: Clip,
        links: LinkTable,
    ) -> Result<Self> {
        let library = Self {
            songs: into_sorted_pool(songs),
            stories: into_sorted_pool(stories),
            transitions: into_sorted_pool(transitions),
            opening: Arc::new(opening),
            links,
        };

        for (kind, pool) in [
            (ClipKind::Song, &library.songs),
            (ClipKind::Story, &library.stories),
            (ClipKind::Transition, &library.transitions),
        ] {
            if pool.is_empty() {
                return Err(Error::Config(format!(
                    "clip library has no {} clips; every program slot needs a non-empty pool",
                    kind
                )));
            }
        }

        for (transition, song) in library.links.iter() {
            if library.get(ClipKind::Transition, transition).is_none() {
                return Err(Error::Config(format!(
                    "link table references unknown transition {}",
                    transition
                )));
            }
            if library.get(ClipKind::Song, song).is_none() {
                return Err(Error::Config(format!(
                    "link table references unknown song {}",
                    song
                )));
            }
        }

        Ok(library)
    }

    /// Clip names in a category, sorted
    pub fn list(&self, kind: ClipKind) -> Vec<&str> {
        self.pool(kind).iter().map(|clip| clip.name()).collect()
    }

    /// Fetch one clip by category and name
    pub fn get(&self, kind: ClipKind, name: &str) -> Option<&Arc<Clip>> {
        self.pool(kind).iter().find(|clip| clip.name() == name)
    }

    /// Full pool for a category, for uniform selection
    pub fn pool(&self, kind: ClipKind) -> &[Arc<Clip>] {
        match kind {
            ClipKind::Song => &self.songs,
            ClipKind::Story => &self.stories,
            ClipKind::Transition => &self.transitions,
        }
    }

    /// The session opener; not a member of any category
    pub fn opening(&self) -> &Arc<Clip> {
        &self.opening
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }
}

fn into_sorted_pool(mut clips: Vec<Clip>) -> Vec<Arc<Clip>> {
    clips.sort_by(|a, b| a.name.cmp(&b.name));
    clips.into_iter().map(Arc::new).collect()
}

/// Decode every clip file in one category directory
fn load_clip_dir(dir: &Path) -> Result<Vec<Clip>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::ClipLoad {
        name: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut clips = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(CLIP_EXTENSION) {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = std::fs::read(&path)?;
        let frames = codec::read_frames(&mut bytes.as_slice()).map_err(|e| Error::ClipLoad {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        debug!("Loaded {} ({} frames)", name, frames.len());
        clips.push(Clip::new(name, frames));
    }

    Ok(clips)
}
