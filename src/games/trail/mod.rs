//! Trail-making task.
//!
//! Numbered dots are scattered under a minimum-separation constraint and the
//! subject connects them in order by dragging. The session reports raw
//! completion time and the number of wrong connections.

mod game;
mod layout;

pub use game::{ErrorFlash, TrailGame, TrailPhase};
pub use layout::{grid_centers, Dot, DotLayout};
