//! Stimulus sequences with a controlled density of n-back matches.

use serde::{Deserialize, Serialize};

use crate::core::{Color, GameRng};

/// Fraction of positions at or after `n` forced to be matches.
pub const MATCH_DENSITY: f64 = 0.3;

/// Stimulus alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Square,
    Circle,
    Triangle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Square, Shape::Circle, Shape::Triangle];

    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Shape::Square => Color::PRIMARY,
            Shape::Circle => Color::TEAL,
            Shape::Triangle => Color::CORAL,
        }
    }
}

/// An immutable sequence of shapes for one session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusSequence {
    shapes: Vec<Shape>,
    n: usize,
    forced: Vec<usize>,
}

impl StimulusSequence {
    /// Draw `length` random shapes, then force `floor((length - n) * 0.3)`
    /// distinct positions `i >= n` to repeat the shape `n` steps earlier.
    ///
    /// Forced positions are applied in ascending order, so a later copy can
    /// only read from an earlier, already-final position and never breaks a
    /// match that was forced before it.
    pub fn generate(length: usize, n: usize, rng: &mut GameRng) -> Self {
        let mut shapes: Vec<Shape> = (0..length)
            .map(|_| Shape::ALL[rng.gen_range_usize(0..Shape::ALL.len())])
            .collect();

        let eligible = length.saturating_sub(n);
        let count = (eligible as f64 * MATCH_DENSITY).floor() as usize;
        let mut forced: Vec<usize> = rng.sample_indices(eligible, count).into_iter().map(|i| i + n).collect();
        forced.sort_unstable();

        for &i in &forced {
            shapes[i] = shapes[i - n];
        }

        Self { shapes, n, forced }
    }

    /// Wrap a fixed sequence (no forced positions recorded).
    #[must_use]
    pub fn from_shapes(shapes: Vec<Shape>, n: usize) -> Self {
        Self {
            shapes,
            n,
            forced: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Shape> {
        self.shapes.get(index).copied()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Positions that generation forced to be matches, ascending.
    #[must_use]
    pub fn forced_positions(&self) -> &[usize] {
        &self.forced
    }

    /// Whether `index` repeats the shape `n` steps earlier.
    #[must_use]
    pub fn is_match(&self, index: usize) -> bool {
        index >= self.n && index < self.shapes.len() && self.shapes[index] == self.shapes[index - self.n]
    }

    /// Every true match position.
    pub fn match_positions(&self) -> impl Iterator<Item = usize> + '_ {
        (self.n..self.shapes.len()).filter(|&i| self.is_match(i))
    }

    /// Number of true match positions.
    #[must_use]
    pub fn true_matches(&self) -> usize {
        self.match_positions().count()
    }
}
