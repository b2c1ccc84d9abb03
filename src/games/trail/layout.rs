//! Dot placement under a minimum-separation constraint.
//!
//! ## Algorithm
//!
//! Each dot is drawn uniformly inside the padded play area and accepted if
//! it keeps `min_distance` from every dot already placed. If any dot runs
//! out of attempts, the whole layout is replaced by a row-major grid of cell
//! centres, which always terminates and keeps dots evenly spread.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Point, TrailConfig};

/// One numbered target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    /// Label, starting at 1.
    pub number: usize,
    pub center: Point,
}

/// Placed dots, indexed by `number - 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DotLayout {
    dots: Vec<Dot>,
    fallback: bool,
}

impl DotLayout {
    /// Place `config.dot_count` dots.
    pub fn generate(config: &TrailConfig, rng: &mut GameRng) -> Self {
        let padding = config.padding();
        let span = padding..config.grid_size - padding;
        let mut centers: Vec<Point> = Vec::with_capacity(config.dot_count);

        for number in 1..=config.dot_count {
            let placed = (0..config.max_attempts).find_map(|_| {
                let candidate = Point::new(rng.gen_range_f64(span.clone()), rng.gen_range_f64(span.clone()));
                centers
                    .iter()
                    .all(|c| c.distance(candidate) >= config.min_distance)
                    .then_some(candidate)
            });
            match placed {
                Some(center) => centers.push(center),
                None => {
                    tracing::debug!(
                        dot = number,
                        attempts = config.max_attempts,
                        "rejection sampling exhausted, using grid layout"
                    );
                    return Self {
                        dots: numbered(grid_centers(config.dot_count, config.grid_size)),
                        fallback: true,
                    };
                }
            }
        }

        Self {
            dots: numbered(centers),
            fallback: false,
        }
    }

    /// Layout with dots at fixed positions, numbered in order.
    #[must_use]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            dots: numbered(points),
            fallback: false,
        }
    }

    #[must_use]
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Whether placement fell back to the grid.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.fallback
    }

    /// Dot labelled `number`.
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&Dot> {
        number.checked_sub(1).and_then(|i| self.dots.get(i))
    }

    /// Whether `p` is within `radius` of dot `number`.
    #[must_use]
    pub fn hits(&self, number: usize, p: Point, radius: f64) -> bool {
        self.get(number).is_some_and(|d| d.center.distance(p) <= radius)
    }

    /// Nearest dot whose hit circle contains `p`.
    #[must_use]
    pub fn dot_at(&self, p: Point, radius: f64) -> Option<&Dot> {
        self.dots
            .iter()
            .filter(|d| d.center.distance(p) <= radius)
            .min_by(|a, b| a.center.distance(p).total_cmp(&b.center.distance(p)))
    }

    /// Smallest centre-to-centre distance, or `None` with fewer than 2 dots.
    #[must_use]
    pub fn min_separation(&self) -> Option<f64> {
        self.dots
            .iter()
            .enumerate()
            .flat_map(|(i, a)| self.dots[i + 1..].iter().map(move |b| a.center.distance(b.center)))
            .min_by(f64::total_cmp)
    }
}

/// Centres of a `ceil(sqrt n)`-column grid covering the whole area.
#[must_use]
pub fn grid_centers(count: usize, size: f64) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    let cell_w = size / cols as f64;
    let cell_h = size / rows as f64;
    (0..count)
        .map(|i| {
            let (col, row) = (i % cols, i / cols);
            Point::new(col as f64 * cell_w + cell_w / 2.0, row as f64 * cell_h + cell_h / 2.0)
        })
        .collect()
}

fn numbered(points: Vec<Point>) -> Vec<Dot> {
    points
        .into_iter()
        .enumerate()
        .map(|(i, center)| Dot { number: i + 1, center })
        .collect()
}
