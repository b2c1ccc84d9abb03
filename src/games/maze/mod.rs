//! Maze navigation task.
//!
//! A procedurally carved maze with a guaranteed start→exit path. The player
//! moves one cell per directional intent; the session reports raw
//! time-to-exit.

mod game;
mod grid;

pub use game::{MazeGame, MazePhase};
pub use grid::{Cell, GenerationReport, MazeGrid, Position, Repair};
