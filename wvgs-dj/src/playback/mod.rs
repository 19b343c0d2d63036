//! Playback sequencing: shared control state, program policy, engine loop

pub mod engine;
pub mod sequencer;
pub mod state;

pub use engine::RadioEngine;
pub use sequencer::{slot_kind, Picker, RandomPicker, Sequencer};
pub use state::SharedState;
