//! Core building blocks: RNG, geometry, surface, input, time, scheduling,
//! configuration, results, errors.
//!
//! Nothing here knows about a specific game. Engines consume these types and
//! the controller wires them together.

pub mod rng;
pub mod geometry;
pub mod surface;
pub mod input;
pub mod time;
pub mod schedule;
pub mod config;
pub mod record;
pub mod error;

pub use rng::GameRng;
pub use geometry::{circular_difference, normalize_degrees, Point, Rect};
pub use surface::{Color, DisplayList, DrawCommand, Surface};
pub use input::{Direction, InputEvent, Key};
pub use time::{format_clock, ManualClock, Millis, SystemClock, TimeSource};
pub use schedule::{TaskQueue, TaskToken};
pub use config::{ClockConfig, GameOptions, MazeConfig, NBackConfig, TrailConfig, MIN_MAZE_SIZE};
pub use record::{
    GameKind, GameResults, NBackScore, RecordLog, ResultRecord, ResultsSink, TrailResults, RECORD_CAPACITY,
};
pub use error::{GameError, Result};
