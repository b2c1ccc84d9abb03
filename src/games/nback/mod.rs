//! N-back working-memory task.
//!
//! A stimulus sequence is drawn once per session with a controlled density
//! of positions that repeat the shape `n` steps earlier. The subject presses
//! "match" while a stimulus is up; the engine scores presses against the
//! sequence.

mod game;
mod sequence;

pub use game::{Feedback, NBackGame, NBackPhase, MATCH_BUTTON};
pub use sequence::{Shape, StimulusSequence, MATCH_DENSITY};
