//! # cognitive-games
//!
//! Engines for four short cognitive-assessment games: maze navigation,
//! n-back memory, trail-making and clock-setting.
//!
//! ## Design Principles
//!
//! 1. **Host-Driven Time**: Engines never read a clock or spawn timers.
//!    Every entry point takes `now`, and timed behaviour lives in a per-engine
//!    `TaskQueue` the host drains with `advance`/`tick`.
//!
//! 2. **Surface-Agnostic**: Engines draw primitives onto a `Surface` trait
//!    object and consume device-independent `InputEvent`s.
//!
//! 3. **One Completion Funnel**: Engines return their results; the
//!    `GameController` alone stamps, stores and reports them.
//!
//! ## Architecture
//!
//! - **Deterministic Generation**: Maze carving, dot placement and stimulus
//!   sequences draw from a seedable ChaCha RNG, so a seed reproduces a session.
//!
//! - **Generation Counters**: `reset` bumps the task queue's generation, so a
//!   task scheduled before the reset can never fire after it.
//!
//! ## Modules
//!
//! - `core`: RNG, geometry, surface, input, time, scheduling, config, results, errors
//! - `games`: The `GameEngine` contract and the four engines
//! - `controller`: Session lifecycle and the results funnel
//! - `catalog`: Menu metadata for each game
//! - `logging`: `tracing` subscriber setup for hosts and binaries

pub mod core;
pub mod games;
pub mod controller;
pub mod catalog;
pub mod logging;

// Re-export commonly used types
pub use crate::core::{
    GameRng,
    Point, Rect, Color, DrawCommand, DisplayList, Surface,
    Direction, InputEvent, Key,
    Millis, ManualClock, SystemClock, TimeSource,
    TaskQueue, TaskToken,
    GameOptions, MazeConfig, NBackConfig, TrailConfig, ClockConfig,
    GameKind, GameResults, NBackScore, TrailResults, ResultRecord, ResultsSink, RecordLog,
    GameError, Result,
};

pub use crate::games::{GameEngine, ClockGame, MazeGame, NBackGame, TrailGame};

pub use crate::games::maze::{MazeGrid, MazePhase, Position};
pub use crate::games::nback::{NBackPhase, Shape, StimulusSequence};
pub use crate::games::trail::{DotLayout, TrailPhase};
pub use crate::games::clock::{AngleTarget, ClockPhase, ClockTime, Hand, ScoreBand};

pub use crate::controller::{CompletionCallback, GameController, SessionHandle};
pub use crate::catalog::{available_games, game_description, GameDescription};
pub use crate::logging::init_logging;
