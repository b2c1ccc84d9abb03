//! Maze session: Idle → Generated → InProgress → Completed.

use crate::core::{
    format_clock, Color, Direction, DrawCommand, GameKind, GameResults, GameRng, InputEvent, Key, MazeConfig, Millis, Point, Rect,
    Result, Surface, TaskQueue,
};
use crate::games::GameEngine;

use super::grid::{Cell, GenerationReport, MazeGrid, Position};

/// Interval of the elapsed-time display tick.
const TICK_MS: u64 = 1000;

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazePhase {
    /// No maze yet.
    Idle,
    /// Maze generated, timer not started.
    Generated,
    /// Timer running, moves accepted.
    InProgress,
    /// Exit reached.
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MazeTask {
    Tick,
}

/// Maze navigation engine.
#[derive(Clone, Debug)]
pub struct MazeGame {
    config: MazeConfig,
    rng: GameRng,
    phase: MazePhase,
    grid: Option<MazeGrid>,
    report: Option<GenerationReport>,
    player: Position,
    started_at: Option<Millis>,
    finished_at: Option<Millis>,
    displayed_seconds: u64,
    moves: u32,
    tasks: TaskQueue<MazeTask>,
    /// Completion banner, owned so reset can drop it directly.
    banner: Option<String>,
}

impl MazeGame {
    /// Create an idle engine. Fails on an invalid configuration.
    pub fn new(config: MazeConfig, rng: GameRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            phase: MazePhase::Idle,
            grid: None,
            report: None,
            player: Position::default(),
            started_at: None,
            finished_at: None,
            displayed_seconds: 0,
            moves: 0,
            tasks: TaskQueue::new(),
            banner: None,
        })
    }

    /// Generate a fresh maze and enter `Generated`.
    pub fn generate(&mut self) {
        let mut layout_rng = self.rng.fork();
        let (grid, report) = MazeGrid::generate(&self.config, &mut layout_rng);
        self.player = grid.start();
        self.grid = Some(grid);
        self.report = Some(report);
        self.phase = MazePhase::Generated;
    }

    #[must_use]
    pub fn phase(&self) -> MazePhase {
        self.phase
    }

    #[must_use]
    pub fn grid(&self) -> Option<&MazeGrid> {
        self.grid.as_ref()
    }

    #[must_use]
    pub fn report(&self) -> Option<&GenerationReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn player(&self) -> Position {
        self.player
    }

    /// Accepted moves this session.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Whole seconds shown on the elapsed-time display.
    #[must_use]
    pub fn displayed_seconds(&self) -> u64 {
        self.displayed_seconds
    }

    /// Shortest path from the player's cell to the exit.
    #[must_use]
    pub fn solution(&self) -> Option<Vec<Position>> {
        let grid = self.grid.as_ref()?;
        grid.shortest_path(self.player, grid.exit())
    }

    /// Seconds since the timer started (frozen at completion).
    #[must_use]
    pub fn elapsed_seconds(&self, now: Millis) -> f64 {
        match self.started_at {
            Some(start) => self.finished_at.unwrap_or(now).seconds_since(start),
            None => 0.0,
        }
    }

    /// Try one move. Blocked or out-of-session moves are ignored.
    pub fn move_player(&mut self, direction: Direction, now: Millis) -> Option<GameResults> {
        if self.phase != MazePhase::InProgress {
            return None;
        }
        let grid = self.grid.as_ref()?;
        let next = grid.step(self.player, direction)?;
        if grid.cell(next) == Cell::Wall {
            return None;
        }

        self.player = next;
        self.moves += 1;
        if next == grid.exit() {
            return Some(self.complete(now));
        }
        None
    }

    fn complete(&mut self, now: Millis) -> GameResults {
        self.phase = MazePhase::Completed;
        self.finished_at = Some(now);
        self.tasks.cancel_all();

        let time = self.elapsed_seconds(now);
        self.displayed_seconds = time.floor() as u64;
        self.banner = Some(format!("Maze Completed! Time: {}", format_clock(time)));
        tracing::debug!(time, moves = self.moves, "maze completed");
        GameResults::Maze { time }
    }

    /// Cell under a surface point.
    fn cell_at(&self, p: Point) -> Option<Position> {
        let grid = self.grid.as_ref()?;
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let pos = Position::new((p.x / self.config.cell_size) as usize, (p.y / self.config.cell_size) as usize);
        (pos.x < grid.width() && pos.y < grid.height()).then_some(pos)
    }

    fn cell_rect(&self, pos: Position) -> Rect {
        let size = self.config.cell_size;
        Rect::new(pos.x as f64 * size, pos.y as f64 * size, size, size)
    }
}

impl GameEngine for MazeGame {
    fn kind(&self) -> GameKind {
        GameKind::Maze
    }

    fn start(&mut self, now: Millis) {
        if self.phase == MazePhase::Idle {
            self.generate();
        }
        if self.phase != MazePhase::Generated {
            return;
        }
        self.phase = MazePhase::InProgress;
        self.started_at = Some(now);
        self.displayed_seconds = 0;
        self.tasks.schedule(now, TICK_MS, MazeTask::Tick);
    }

    fn handle_input(&mut self, event: &InputEvent, now: Millis) -> Option<GameResults> {
        match *event {
            InputEvent::KeyDown(Key::Arrow(direction)) => self.move_player(direction, now),
            InputEvent::KeyDown(Key::Enter) if self.phase != MazePhase::InProgress => {
                if self.phase == MazePhase::Completed {
                    self.reset(now);
                }
                self.start(now);
                None
            }
            // A tap on a neighbouring cell moves toward it
            InputEvent::PointerDown(p) => {
                let target = self.cell_at(p)?;
                let direction = self.player.direction_to(target)?;
                self.move_player(direction, now)
            }
            _ => None,
        }
    }

    fn advance(&mut self, now: Millis) -> Option<GameResults> {
        while let Some((due, task)) = self.tasks.pop_due(now) {
            match task {
                MazeTask::Tick => {
                    let Some(start) = self.started_at else { continue };
                    self.displayed_seconds = due.since(start) / 1000;
                    tracing::trace!(seconds = self.displayed_seconds, "maze tick");
                    self.tasks.schedule(due, TICK_MS, MazeTask::Tick);
                }
            }
        }
        None
    }

    fn reset(&mut self, _now: Millis) {
        self.tasks.cancel_all();
        self.banner = None;
        self.started_at = None;
        self.finished_at = None;
        self.displayed_seconds = 0;
        self.moves = 0;
        self.generate();
    }

    fn render(&self, surface: &mut dyn Surface, _now: Millis) {
        let Some(grid) = &self.grid else {
            surface.text(Point::new(10.0, 20.0), "Press start to generate a maze", 16.0, Color::INK);
            return;
        };

        for (y, row) in grid.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let rect = self.cell_rect(Position::new(x, y));
                match cell {
                    Cell::Wall => surface.fill_rect(rect, Color::INK),
                    Cell::Path => surface.draw(DrawCommand::Rect {
                        rect,
                        fill: Color::BACKGROUND,
                        stroke: Some(Color::BORDER),
                    }),
                }
            }
        }

        let marker = self.config.cell_size / 3.0;
        surface.circle(self.cell_rect(grid.exit()).center(), marker, Color::SUCCESS);
        surface.circle(self.cell_rect(self.player).center(), marker, Color::PRIMARY);

        let below = grid.height() as f64 * self.config.cell_size;
        surface.text(
            Point::new(0.0, below + 24.0),
            &format!("Time: {}", format_clock(self.displayed_seconds as f64)),
            16.0,
            Color::INK,
        );
        if let Some(banner) = &self.banner {
            surface.text(Point::new(0.0, below + 48.0), banner, 16.0, Color::SUCCESS);
        }
    }

    fn results(&self, now: Millis) -> GameResults {
        GameResults::Maze {
            time: self.elapsed_seconds(now),
        }
    }

    fn is_complete(&self) -> bool {
        self.phase == MazePhase::Completed
    }

    fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }
}
