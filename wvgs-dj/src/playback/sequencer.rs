//! Program sequencing policy
//!
//! Decides what plays at each program slot: the opening at slot 0, a
//! transition every fifth slot, a story every remaining fourth slot, and a
//! song otherwise. Which clip fills the slot is drawn uniformly from its
//! pool, unless a transition has scheduled a specific follow-up song.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use wvgs_common::events::{ClipKind, RadioEvent};

pub use wvgs_common::events::SlotKind;

use crate::library::{Clip, ClipLibrary};
use crate::playback::state::SharedState;

/// Slot category as a pure function of the program index
pub fn slot_kind(index: u64) -> SlotKind {
    if index == 0 {
        SlotKind::Opening
    } else if index % 5 == 0 {
        SlotKind::Transition
    } else if index % 4 == 0 {
        SlotKind::Story
    } else {
        SlotKind::Song
    }
}

/// Uniform choice out of a pool
///
/// The sequencer draws through this seam so tests can pin selection.
pub trait Picker: Send + Sync {
    /// Returns an index in `0..pool_len`; `pool_len` is never 0
    fn pick(&mut self, pool_len: usize) -> usize;
}

/// Production picker: one PRNG seeded at construction
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic picker for reproducible auditions
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for RandomPicker {
    fn pick(&mut self, pool_len: usize) -> usize {
        self.rng.gen_range(0..pool_len)
    }
}

/// Produces the program, one clip per slot
///
/// Owns the picker and coordinates forced follow-ups through the shared
/// state: a linked transition schedules its song, and the next song slot
/// consumes it.
pub struct Sequencer {
    picker: Box<dyn Picker>,
}

impl Sequencer {
    pub fn new(picker: Box<dyn Picker>) -> Self {
        Self { picker }
    }

    /// Sequencer with entropy-seeded selection
    pub fn random() -> Self {
        Self::new(Box::new(RandomPicker::new()))
    }

    /// Select the clip for `index`
    ///
    /// Selecting a linked transition records its follow-up song in `state`;
    /// a song slot with a pending follow-up plays and consumes it.
    pub fn next_clip(
        &mut self,
        index: u64,
        library: &ClipLibrary,
        state: &SharedState,
    ) -> Arc<Clip> {
        match slot_kind(index) {
            SlotKind::Opening => Arc::clone(library.opening()),
            SlotKind::Transition => {
                let clip = self.draw(library, ClipKind::Transition);
                if let Some(song) = library.links().follow_up(clip.name()) {
                    debug!(
                        "Transition {} schedules follow-up song {}",
                        clip.name(),
                        song
                    );
                    state.set_forced_song(song.to_string());
                    state.broadcast_event(RadioEvent::FollowUpScheduled {
                        transition: clip.name().to_string(),
                        song: song.to_string(),
                        timestamp: Utc::now(),
                    });
                }
                clip
            }
            SlotKind::Story => self.draw(library, ClipKind::Story),
            SlotKind::Song => {
                if let Some(name) = state.take_forced_song() {
                    if let Some(clip) = library.get(ClipKind::Song, &name) {
                        return Arc::clone(clip);
                    }
                    // Link targets are validated at library build time
                    warn!("Forced song {} not in library, drawing at random", name);
                }
                self.draw(library, ClipKind::Song)
            }
        }
    }

    fn draw(&mut self, library: &ClipLibrary, kind: ClipKind) -> Arc<Clip> {
        let pool = library.pool(kind);
        Arc::clone(&pool[self.picker.pick(pool.len())])
    }
}
