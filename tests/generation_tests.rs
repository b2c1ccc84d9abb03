//! Procedural generation integration tests.
//!
//! These tests check the guarantees each generator makes for every seed and
//! configuration, not just the defaults.

use proptest::prelude::*;

use cognitive_games::games::maze::{Cell, MazeGrid, Position, Repair};
use cognitive_games::games::trail::grid_centers;
use cognitive_games::{DotLayout, GameRng, MazeConfig, NBackConfig, StimulusSequence, TrailConfig};

// =============================================================================
// Maze Tests
// =============================================================================

proptest! {
    /// Every generated maze has an open start→exit path.
    #[test]
    fn maze_always_solvable(
        width in 4usize..30,
        height in 4usize..30,
        complexity in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let config = MazeConfig::default().with_dimensions(width, height).with_complexity(complexity);
        let (grid, _) = MazeGrid::generate(&config, &mut GameRng::new(seed));

        prop_assert_eq!(grid.start(), Position::new(1, 1));
        prop_assert_eq!(grid.exit(), Position::new(width - 2, height - 2));
        prop_assert!(grid.is_open(grid.start()));
        prop_assert!(grid.is_open(grid.exit()));

        let path = grid.solution();
        prop_assert!(path.is_some(), "no path for seed {seed} at {width}x{height}");
        let path = path.unwrap();
        prop_assert_eq!(path.first().copied(), Some(grid.start()));
        prop_assert_eq!(path.last().copied(), Some(grid.exit()));
        for step in path.windows(2) {
            prop_assert_eq!(step[0].manhattan(step[1]), 1);
            prop_assert!(grid.is_open(step[1]));
        }
    }

    /// Same seed, same maze.
    #[test]
    fn maze_generation_deterministic(size in 4usize..20, seed in any::<u64>()) {
        let config = MazeConfig::default().with_size(size);
        let a = MazeGrid::generate(&config, &mut GameRng::new(seed));
        let b = MazeGrid::generate(&config, &mut GameRng::new(seed));
        prop_assert_eq!(a, b);
    }
}

/// Test that search reports an exit walled off from the start.
#[test]
fn test_walled_off_exit_has_no_solution() {
    let grid = MazeGrid::parse(&[
        "#######",
        "#S..#.#",
        "#...#.#",
        "#...#E#",
        "#######",
    ])
    .unwrap();
    assert_eq!(grid.exit(), Position::new(5, 3));
    assert!(grid.solution().is_none());
    assert_eq!(grid.cell(Position::new(4, 2)), Cell::Wall);
}

/// Test that the smallest maze with no extra openings still has a path.
#[test]
fn test_four_by_four_perfect_maze_is_solvable() {
    let config = MazeConfig::default().with_size(4).with_complexity(1.0);
    assert_eq!(config.extra_openings(), 0);

    for seed in 0..500 {
        let (grid, report) = MazeGrid::generate(&config, &mut GameRng::new(seed));
        assert_eq!(report.extra_openings, 0);
        assert_eq!((grid.width(), grid.height()), (4, 4));
        assert_eq!(grid.exit(), Position::new(2, 2));
        assert!(grid.solution().is_some(), "seed {seed} left 4x4 unsolvable");
    }
}

/// Test that low complexity punches more openings than high complexity.
#[test]
fn test_complexity_controls_extra_openings() {
    let open = MazeConfig::default().with_size(20).with_complexity(0.0);
    let tight = MazeConfig::default().with_size(20).with_complexity(1.0);
    assert_eq!(open.extra_openings(), 40);
    assert_eq!(tight.extra_openings(), 0);

    let (_, report) = MazeGrid::generate(&tight, &mut GameRng::new(5));
    assert_eq!(report.extra_openings, 0);
    let (_, report) = MazeGrid::generate(&open, &mut GameRng::new(5));
    assert_eq!(report.extra_openings, 40);
}

/// Test that a reported corridor always opened at least one cell.
#[test]
fn test_repair_reports_opened_cells() {
    for seed in 0..50 {
        let config = MazeConfig::default().with_size(10 + (seed as usize % 7));
        let (grid, report) = MazeGrid::generate(&config, &mut GameRng::new(seed));
        assert!(grid.solution().is_some());
        if let Repair::Corridor { opened, .. } = report.repair {
            assert!(opened > 0, "seed {seed} reported an empty corridor");
        }
    }
}

// =============================================================================
// Trail Layout Tests
// =============================================================================

proptest! {
    /// Either every pair of dots keeps the minimum distance, or the layout
    /// is exactly the fallback grid.
    #[test]
    fn trail_separation_or_grid(
        dots in 2usize..25,
        min_distance in 0.0f64..150.0,
        seed in any::<u64>(),
    ) {
        let config = TrailConfig::default().with_dots(dots).with_min_distance(min_distance);
        let layout = DotLayout::generate(&config, &mut GameRng::new(seed));
        prop_assert_eq!(layout.len(), dots);

        if layout.used_fallback() {
            let grid: Vec<_> = grid_centers(dots, config.grid_size);
            let placed: Vec<_> = layout.dots().iter().map(|d| d.center).collect();
            prop_assert_eq!(placed, grid);
        } else {
            prop_assert!(layout.min_separation().unwrap() >= min_distance);
        }

        for (i, dot) in layout.dots().iter().enumerate() {
            prop_assert_eq!(dot.number, i + 1);
            prop_assert!(dot.center.x > 0.0 && dot.center.x < config.grid_size);
            prop_assert!(dot.center.y > 0.0 && dot.center.y < config.grid_size);
        }
    }
}

// =============================================================================
// N-Back Sequence Tests
// =============================================================================

proptest! {
    /// True matches never fall below the forced count, and every forced
    /// position survives generation.
    #[test]
    fn nback_forced_matches_survive(
        n in 1usize..5,
        extra in 1usize..60,
        seed in any::<u64>(),
    ) {
        let length = n + extra;
        let config = NBackConfig::default().with_n(n).with_length(length);
        let sequence = StimulusSequence::generate(length, n, &mut GameRng::new(seed));

        prop_assert_eq!(sequence.len(), length);
        prop_assert_eq!(sequence.forced_positions().len(), config.forced_matches());
        prop_assert!(sequence.true_matches() >= config.forced_matches());
        for &i in sequence.forced_positions() {
            prop_assert!(i >= n);
            prop_assert!(sequence.is_match(i));
        }
    }
}
