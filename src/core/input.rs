//! Input events consumed by the engines.
//!
//! Coordinates are already mapped into surface space by the host.

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// A grid direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions, clockwise from up.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Unit step `(dx, dy)` in grid space (y grows downward).
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// A key press, reduced to what the games care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Arrow(Direction),
    Space,
    Enter,
    Other,
}

/// A discrete input event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    KeyDown(Key),
}

impl InputEvent {
    /// The pointer position, if this is a pointer event.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match *self {
            InputEvent::PointerDown(p) | InputEvent::PointerMove(p) | InputEvent::PointerUp(p) => Some(p),
            InputEvent::KeyDown(_) => None,
        }
    }
}
