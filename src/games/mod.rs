//! Game engines and the lifecycle contract they share.
//!
//! Each engine implements `GameEngine` to define:
//! - How input events move its state machine
//! - What its scheduled tasks do when they fire
//! - How it draws itself
//! - What its raw result metric is
//!
//! The controller calls into `GameEngine` and never interprets
//! game-specific state directly.

pub mod clock;
pub mod maze;
pub mod nback;
pub mod trail;

use crate::core::{GameKind, GameResults, InputEvent, Millis, Surface};

pub use clock::ClockGame;
pub use maze::MazeGame;
pub use nback::NBackGame;
pub use trail::TrailGame;

/// Lifecycle contract for one game session.
///
/// ## Implementation Notes
///
/// - Every method returns immediately; time only moves when the host calls
///   `advance`.
/// - `handle_input` and `advance` return `Some(results)` exactly once per
///   session, on the transition into the completed state.
/// - Input that matches no valid transition is ignored and returns `None`.
/// - `reset` must cancel every pending task before touching state.
pub trait GameEngine {
    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Leave the pre-session state. A no-op for games whose session is
    /// started by input, or once a session is under way.
    fn start(&mut self, now: Millis);

    /// Feed one input event.
    fn handle_input(&mut self, event: &InputEvent, now: Millis) -> Option<GameResults>;

    /// Fire every scheduled task due at or before `now`.
    fn advance(&mut self, now: Millis) -> Option<GameResults>;

    /// Discard the session and prepare a fresh one.
    fn reset(&mut self, now: Millis);

    /// Draw the current frame. Callers clear the surface first.
    fn render(&self, surface: &mut dyn Surface, now: Millis);

    /// Current raw metric (score, tallies, or elapsed time).
    fn results(&self, now: Millis) -> GameResults;

    /// Whether the session has completed.
    fn is_complete(&self) -> bool;

    /// Live scheduled tasks.
    fn pending_tasks(&self) -> usize;
}
