//! Clock-setting task.
//!
//! The subject drags an hour and a minute hand to show a target time. On
//! submit each hand is scored by its shortest-arc distance to the target
//! angle, with the hour hand weighted more heavily.

mod angles;
mod game;

pub use angles::{hand_accuracy, AngleTarget, ClockTime, ScoreBand, HOUR_WEIGHT, MINUTE_WEIGHT, TWELVE_O_CLOCK};
pub use game::{ClockGame, ClockPhase, Hand};
