//! Maze grid generation and search.
//!
//! ## Generation Pipeline
//!
//! 1. Randomized depth-first carving on a 2-cell stride from a random
//!    even-coordinate origin. Even/even cells are rooms; the cell between two
//!    rooms is opened when the walk moves between them.
//! 2. `(1 - complexity) * W * H * 0.1` extra openings at random interior cells.
//! 3. Start `(1, 1)` and exit `(W-2, H-2)` are forced open.
//! 4. A* from start to exit. If the exit is unreachable, a corridor is carved
//!    from the explored cell closest to the exit, stepping monotonically
//!    toward it (x first, then y).
//!
//! Step 4 makes start→exit reachability a property of every generated grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Direction, GameRng, MazeConfig};

/// State of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
}

/// Grid coordinates (column, row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance.
    #[must_use]
    pub const fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Direction of a 4-adjacent neighbour, if `other` is one.
    #[must_use]
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| {
            let (dx, dy) = d.delta();
            self.x as i64 + dx == other.x as i64 && self.y as i64 + dy == other.y as i64
        })
    }
}

/// How the connectivity guarantee was met.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repair {
    /// The carve already connected start and exit.
    NotNeeded,
    /// A corridor was opened from `from` to the exit.
    Corridor { from: Position, opened: usize },
}

/// What happened during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Room the depth-first walk started from.
    pub carve_origin: Position,
    /// Extra openings punched after carving.
    pub extra_openings: usize,
    /// Connectivity repair.
    pub repair: Repair,
}

enum SearchOutcome {
    Found(Vec<Position>),
    /// Unreachable; carries the explored cell closest to the target.
    Unreachable { closest: Position },
}

/// A W×H grid of walls and paths with a start and an exit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    exit: Position,
}

impl MazeGrid {
    /// An all-wall grid with the standard start and exit cells.
    ///
    /// Panics if either dimension is below 2; callers validate configs first.
    #[must_use]
    pub fn filled(width: usize, height: usize) -> Self {
        assert!(width >= 2 && height >= 2, "maze must be at least 2x2");
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
            start: Position::new(1, 1),
            exit: Position::new(width - 2, height - 2),
        }
    }

    /// Generate a solvable maze.
    ///
    /// `config` must already be validated.
    pub fn generate(config: &MazeConfig, rng: &mut GameRng) -> (Self, GenerationReport) {
        let mut grid = Self::filled(config.width, config.height);

        let carve_origin = grid.carve(rng);
        let extra_openings = config.extra_openings();
        grid.punch_openings(extra_openings, rng);

        let (start, exit) = (grid.start, grid.exit);
        grid.set(start, Cell::Path);
        grid.set(exit, Cell::Path);

        let repair = grid.ensure_path();
        if let Repair::Corridor { from, opened } = repair {
            tracing::debug!(?from, opened, "maze exit unreachable after carving, opened corridor");
        }

        let report = GenerationReport {
            carve_origin,
            extra_openings,
            repair,
        };
        (grid, report)
    }

    /// Parse a grid from rows of `#` (wall), `.` (path), `S` (start, open)
    /// and `E` (exit, open). Without markers the standard start and exit
    /// are used.
    ///
    /// Returns `None` for ragged rows, unknown characters, or grids smaller
    /// than 2×2.
    #[must_use]
    pub fn parse(rows: &[&str]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.chars().count();
        if width < 2 || height < 2 {
            return None;
        }
        let mut grid = Self::filled(width, height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return None;
            }
            for (x, ch) in row.chars().enumerate() {
                let pos = Position::new(x, y);
                match ch {
                    '#' => {}
                    '.' => grid.set(pos, Cell::Path),
                    'S' => {
                        grid.set(pos, Cell::Path);
                        grid.start = pos;
                    }
                    'E' => {
                        grid.set(pos, Cell::Path);
                        grid.exit = pos;
                    }
                    _ => return None,
                }
            }
        }
        Some(grid)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub fn exit(&self) -> Position {
        self.exit
    }

    /// Cell at `pos`; out-of-bounds reads as wall.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Cell {
        if self.in_bounds(pos) {
            self.cells[self.idx(pos)]
        } else {
            Cell::Wall
        }
    }

    #[must_use]
    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos) == Cell::Path
    }

    /// In-bounds neighbour of `pos` in `dir`.
    #[must_use]
    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = pos.x.checked_add_signed(dx as isize)?;
        let y = pos.y.checked_add_signed(dy as isize)?;
        (x < self.width && y < self.height).then_some(Position::new(x, y))
    }

    /// Count of open cells.
    #[must_use]
    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Path).count()
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Shortest 4-connected path between two cells, both ends inclusive.
    #[must_use]
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Position>> {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return None;
        }
        match self.search(from, to) {
            SearchOutcome::Found(path) => Some(path),
            SearchOutcome::Unreachable { .. } => None,
        }
    }

    /// Shortest path from start to exit.
    #[must_use]
    pub fn solution(&self) -> Option<Vec<Position>> {
        self.shortest_path(self.start, self.exit)
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn idx(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    fn set(&mut self, pos: Position, cell: Cell) {
        let i = self.idx(pos);
        self.cells[i] = cell;
    }

    /// Randomized depth-first carve over the even-coordinate rooms.
    fn carve(&mut self, rng: &mut GameRng) -> Position {
        let origin = Position::new(
            rng.gen_range_usize(0..self.width.div_ceil(2)) * 2,
            rng.gen_range_usize(0..self.height.div_ceil(2)) * 2,
        );
        self.set(origin, Cell::Path);

        let mut stack = vec![origin];
        while let Some(&current) = stack.last() {
            let candidates: SmallVec<[(Position, Position); 4]> = Direction::ALL
                .into_iter()
                .filter_map(|dir| {
                    let between = self.step(current, dir)?;
                    let room = self.step(between, dir)?;
                    (self.cell(room) == Cell::Wall).then_some((room, between))
                })
                .collect();

            match rng.choose(&candidates) {
                Some(&(room, between)) => {
                    self.set(between, Cell::Path);
                    self.set(room, Cell::Path);
                    stack.push(room);
                }
                None => {
                    stack.pop();
                }
            }
        }
        origin
    }

    /// Open `count` random interior cells (repeats allowed).
    fn punch_openings(&mut self, count: usize, rng: &mut GameRng) {
        for _ in 0..count {
            let x = 1 + rng.gen_range_usize(0..self.width - 2);
            let y = 1 + rng.gen_range_usize(0..self.height - 2);
            self.set(Position::new(x, y), Cell::Path);
        }
    }

    /// Guarantee an open start→exit path without closing anything.
    fn ensure_path(&mut self) -> Repair {
        let closest = match self.search(self.start, self.exit) {
            SearchOutcome::Found(_) => return Repair::NotNeeded,
            SearchOutcome::Unreachable { closest } => closest,
        };

        let mut opened = 0;
        let mut pos = closest;
        loop {
            if self.cell(pos) == Cell::Wall {
                self.set(pos, Cell::Path);
                opened += 1;
            }
            if pos == self.exit {
                break;
            }
            if pos.x != self.exit.x {
                pos.x = if pos.x < self.exit.x { pos.x + 1 } else { pos.x - 1 };
            } else {
                pos.y = if pos.y < self.exit.y { pos.y + 1 } else { pos.y - 1 };
            }
        }
        Repair::Corridor { from: closest, opened }
    }

    /// A* with unit step cost and a Manhattan heuristic.
    fn search(&self, from: Position, to: Position) -> SearchOutcome {
        let mut open = BinaryHeap::new();
        let mut g_score: FxHashMap<Position, usize> = FxHashMap::default();
        let mut came_from: FxHashMap<Position, Position> = FxHashMap::default();
        let mut closed = vec![false; self.cells.len()];
        let mut closest = (from.manhattan(to), 0, from);
        let mut counter = 0u64;

        g_score.insert(from, 0);
        open.push(Reverse((from.manhattan(to), counter, from)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            let ci = self.idx(current);
            if closed[ci] {
                continue;
            }
            closed[ci] = true;

            let g = g_score[&current];
            let h = current.manhattan(to);
            if (h, g) < (closest.0, closest.1) {
                closest = (h, g, current);
            }

            if current == to {
                let mut path = vec![current];
                let mut node = current;
                while let Some(&prev) = came_from.get(&node) {
                    path.push(prev);
                    node = prev;
                }
                path.reverse();
                return SearchOutcome::Found(path);
            }

            for dir in Direction::ALL {
                let Some(next) = self.step(current, dir) else {
                    continue;
                };
                if !self.is_open(next) || closed[self.idx(next)] {
                    continue;
                }
                let tentative = g + 1;
                if g_score.get(&next).map_or(true, |&old| tentative < old) {
                    g_score.insert(next, tentative);
                    came_from.insert(next, current);
                    counter += 1;
                    open.push(Reverse((tentative + next.manhattan(to), counter, next)));
                }
            }
        }

        SearchOutcome::Unreachable { closest: closest.2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_accessors() {
        let grid = MazeGrid::parse(&["#####", "#S..#", "###.#", "#E..#", "#####"]).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.start(), Position::new(1, 1));
        assert_eq!(grid.exit(), Position::new(1, 3));
        assert!(grid.is_open(Position::new(3, 2)));
        assert!(!grid.is_open(Position::new(0, 0)));
        assert!(!grid.is_open(Position::new(99, 0)));
        assert_eq!(grid.open_cells(), 7);

        assert!(MazeGrid::parse(&["###", "##"]).is_none());
        assert!(MazeGrid::parse(&["#x", "##"]).is_none());
        assert!(MazeGrid::parse(&["#"]).is_none());
    }

    #[test]
    fn test_shortest_path_follows_corridor() {
        let grid = MazeGrid::parse(&["#####", "#S..#", "###.#", "#E..#", "#####"]).unwrap();
        let path = grid.solution().unwrap();
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.exit()));
        assert_eq!(path.len(), 7);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
            assert!(grid.is_open(pair[1]));
        }
    }

    #[test]
    fn test_shortest_path_prefers_short_route() {
        let grid = MazeGrid::parse(&[
            "#######",
            "#S...E#",
            "#.###.#",
            "#.....#",
            "#######",
        ])
        .unwrap();
        assert_eq!(grid.solution().unwrap().len(), 5);
    }

    #[test]
    fn test_unreachable_is_none() {
        let grid = MazeGrid::parse(&["#####", "#S#E#", "#####"]).unwrap();
        assert!(grid.solution().is_none());
    }

    #[test]
    fn test_ensure_path_opens_corridor_from_closest_explored_cell() {
        let mut grid = MazeGrid::parse(&[
            "#######",
            "#S..###",
            "#######",
            "#######",
            "#####E#",
            "#######",
        ])
        .unwrap();
        let repair = grid.ensure_path();

        // (3,1) is the reachable cell closest to the exit at (5,4)
        assert_eq!(
            repair,
            Repair::Corridor {
                from: Position::new(3, 1),
                opened: 4
            }
        );
        assert!(grid.solution().is_some());
        assert_eq!(grid.ensure_path(), Repair::NotNeeded);
    }

    #[test]
    fn test_ensure_path_never_closes_cells() {
        let mut grid = MazeGrid::parse(&["######", "#S#..#", "######", "#..#E#", "######"]).unwrap();
        let before = grid.clone();
        grid.ensure_path();
        for (a, b) in before.rows().flatten().zip(grid.rows().flatten()) {
            assert!(!(*a == Cell::Path && *b == Cell::Wall));
        }
    }

    #[test]
    fn test_carve_opens_rooms_only_on_even_coordinates() {
        let mut rng = GameRng::new(5);
        let mut grid = MazeGrid::filled(11, 9);
        let origin = grid.carve(&mut rng);
        assert_eq!(origin.x % 2, 0);
        assert_eq!(origin.y % 2, 0);

        // Every room is carved, no odd/odd cell is opened
        for (y, row) in grid.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if x % 2 == 0 && y % 2 == 0 {
                    assert_eq!(*cell, Cell::Path, "room ({x},{y}) left closed");
                }
                if x % 2 == 1 && y % 2 == 1 {
                    assert_eq!(*cell, Cell::Wall, "odd cell ({x},{y}) opened");
                }
            }
        }
        // A spanning tree over 6x5 rooms opens exactly rooms + (rooms - 1) cells
        assert_eq!(grid.open_cells(), 30 + 29);
    }

    #[test]
    fn test_generate_is_solvable_and_deterministic() {
        let config = MazeConfig::default();
        let (a, report) = MazeGrid::generate(&config, &mut GameRng::new(42));
        let (b, _) = MazeGrid::generate(&config, &mut GameRng::new(42));
        assert_eq!(a, b);
        assert_eq!(report.extra_openings, 3);
        assert!(a.is_open(a.start()));
        assert!(a.is_open(a.exit()));
        assert!(a.solution().is_some());
    }

    #[test]
    fn test_direction_to() {
        let p = Position::new(2, 2);
        assert_eq!(p.direction_to(Position::new(2, 1)), Some(Direction::Up));
        assert_eq!(p.direction_to(Position::new(3, 2)), Some(Direction::Right));
        assert_eq!(p.direction_to(Position::new(3, 3)), None);
        assert_eq!(Position::new(0, 0).direction_to(Position::new(0, 1)), Some(Direction::Down));
    }
}
