//! Game configuration types.
//!
//! Hosts configure each session by providing:
//! - `MazeConfig`: grid size, cell size, loop density
//! - `NBackConfig`: n, sequence length, presentation timing
//! - `TrailConfig`: dot count, play area, separation rules
//! - `ClockConfig`: target time, clock size
//! - `GameOptions`: all of the above plus an optional RNG seed
//!
//! Every field has a default, so partial JSON configs deserialize cleanly.

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use super::record::GameKind;

/// Smallest maze dimension that still has distinct start and exit cells.
pub const MIN_MAZE_SIZE: usize = 4;

/// Maze configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Grid columns.
    pub width: usize,

    /// Grid rows.
    pub height: usize,

    /// Rendered size of one cell.
    pub cell_size: f64,

    /// 1.0 = perfect maze (no extra openings); lower values punch more loops.
    pub complexity: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_size: 40.0,
            complexity: 0.7,
        }
    }
}

impl MazeConfig {
    /// Square maze of the given size.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.width = size;
        self.height = size;
        self
    }

    #[must_use]
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.complexity = complexity;
        self
    }

    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Number of extra openings punched after carving.
    #[must_use]
    pub fn extra_openings(&self) -> usize {
        let raw = (1.0 - self.complexity.clamp(0.0, 1.0)) * (self.width * self.height) as f64 * 0.1;
        raw.floor() as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_MAZE_SIZE || self.height < MIN_MAZE_SIZE {
            return Err(GameError::config(
                GameKind::Maze,
                format!("size must be at least {MIN_MAZE_SIZE}x{MIN_MAZE_SIZE}, got {}x{}", self.width, self.height),
            ));
        }
        if !(self.cell_size > 0.0) {
            return Err(GameError::config(GameKind::Maze, "cell size must be positive"));
        }
        if !(0.0..=1.0).contains(&self.complexity) {
            return Err(GameError::config(GameKind::Maze, "complexity must be within 0..=1"));
        }
        Ok(())
    }
}

/// N-back configuration. Durations are in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NBackConfig {
    /// How many steps back a match refers to.
    pub n_value: usize,

    /// Number of stimuli in the session.
    pub sequence_length: usize,

    /// How long each stimulus is shown.
    pub stimulus_duration: u64,

    /// Blank gap between stimuli.
    pub inter_stimulus_interval: u64,

    /// Lead-in before the first stimulus.
    pub start_delay: u64,

    /// How long the correct/incorrect flash stays up.
    pub feedback_duration: u64,
}

impl Default for NBackConfig {
    fn default() -> Self {
        Self {
            n_value: 1,
            sequence_length: 20,
            stimulus_duration: 1500,
            inter_stimulus_interval: 500,
            start_delay: 1000,
            feedback_duration: 300,
        }
    }
}

impl NBackConfig {
    #[must_use]
    pub fn with_n(mut self, n: usize) -> Self {
        self.n_value = n;
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: usize) -> Self {
        self.sequence_length = length;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, stimulus_duration: u64, inter_stimulus_interval: u64) -> Self {
        self.stimulus_duration = stimulus_duration;
        self.inter_stimulus_interval = inter_stimulus_interval;
        self
    }

    /// Number of positions forced to be n-back matches.
    #[must_use]
    pub fn forced_matches(&self) -> usize {
        (self.sequence_length.saturating_sub(self.n_value) as f64 * 0.3).floor() as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_value == 0 {
            return Err(GameError::config(GameKind::NBack, "n must be at least 1"));
        }
        if self.sequence_length <= self.n_value {
            return Err(GameError::config(
                GameKind::NBack,
                format!("sequence length {} must exceed n = {}", self.sequence_length, self.n_value),
            ));
        }
        if self.stimulus_duration == 0 || self.inter_stimulus_interval == 0 {
            return Err(GameError::config(GameKind::NBack, "stimulus timings must be positive"));
        }
        Ok(())
    }
}

/// Trail-making configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Number of dots, labelled `1..=dot_count`.
    pub dot_count: usize,

    /// Side of the square play area.
    pub grid_size: f64,

    /// Hit radius (and drawn radius) of a dot.
    pub dot_radius: f64,

    /// Minimum centre-to-centre distance between any two dots.
    pub min_distance: f64,

    /// Candidate draws per dot before switching to grid placement.
    pub max_attempts: usize,

    /// How long a wrong connection stays on screen (ms).
    pub error_flash: u64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            dot_count: 10,
            grid_size: 400.0,
            dot_radius: 20.0,
            min_distance: 60.0,
            max_attempts: 50,
            error_flash: 500,
        }
    }
}

impl TrailConfig {
    #[must_use]
    pub fn with_dots(mut self, count: usize) -> Self {
        self.dot_count = count;
        self
    }

    #[must_use]
    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    #[must_use]
    pub fn with_min_distance(mut self, distance: f64) -> Self {
        self.min_distance = distance;
        self
    }

    /// Inset from the play-area edge for random placement.
    #[must_use]
    pub fn padding(&self) -> f64 {
        self.dot_radius * 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.dot_count < 2 {
            return Err(GameError::config(GameKind::Trail, "at least 2 dots are required"));
        }
        if !(self.dot_radius > 0.0) {
            return Err(GameError::config(GameKind::Trail, "dot radius must be positive"));
        }
        if !(self.grid_size > self.padding() * 2.0) {
            return Err(GameError::config(
                GameKind::Trail,
                format!("grid size {} leaves no room inside the {} padding", self.grid_size, self.padding()),
            ));
        }
        if self.min_distance < 0.0 {
            return Err(GameError::config(GameKind::Trail, "minimum distance cannot be negative"));
        }
        Ok(())
    }
}

/// Clock-setting configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Time to set, `HH:MM`.
    pub target_time: String,

    /// Diameter of the clock face.
    pub clock_size: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            target_time: "10:10".to_string(),
            clock_size: 300.0,
        }
    }
}

impl ClockConfig {
    #[must_use]
    pub fn with_target(mut self, target_time: impl Into<String>) -> Self {
        self.target_time = target_time.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.clock_size > 0.0) {
            return Err(GameError::config(GameKind::Clock, "clock size must be positive"));
        }
        Ok(())
    }
}

/// Options handed to the controller when starting a session.
///
/// Only the section matching the selected game is used.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// RNG seed. `None` draws a fresh one.
    pub seed: Option<u64>,
    pub maze: MazeConfig,
    pub nback: NBackConfig,
    pub trail: TrailConfig,
    pub clock: ClockConfig,
}

impl GameOptions {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_maze(mut self, maze: MazeConfig) -> Self {
        self.maze = maze;
        self
    }

    #[must_use]
    pub fn with_nback(mut self, nback: NBackConfig) -> Self {
        self.nback = nback;
        self
    }

    #[must_use]
    pub fn with_trail(mut self, trail: TrailConfig) -> Self {
        self.trail = trail;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }
}
