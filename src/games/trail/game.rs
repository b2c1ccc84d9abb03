//! Trail-making session: AwaitingStart → Tracing → Completed.
//!
//! The subject drags from the last connected dot to the next number. A
//! release on the right dot draws a permanent segment; a release on a wrong
//! dot counts an error and flashes a red segment that clears itself after
//! `error_flash` milliseconds. Flashes never block input.

use crate::core::{
    Color, DrawCommand, GameKind, GameResults, GameRng, InputEvent, Millis, Point, Result, Surface, TaskQueue,
    TrailConfig, TrailResults,
};
use crate::games::GameEngine;

use super::layout::DotLayout;

const LINE_WIDTH: f64 = 3.0;

/// Alpha of dots not yet reachable.
const FUTURE_ALPHA: f64 = 0.7;

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailPhase {
    /// Waiting for the first press on dot 1.
    AwaitingStart,
    Tracing,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrailTask {
    ClearError(u64),
}

/// A wrong connection on screen until its clear task fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorFlash {
    id: u64,
    /// Dot the drag started from.
    pub from: usize,
    /// Dot the drag was released on.
    pub to: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Drag {
    origin: usize,
    pointer: Point,
}

/// Trail-making engine.
#[derive(Clone, Debug)]
pub struct TrailGame {
    config: TrailConfig,
    layout: DotLayout,
    phase: TrailPhase,
    /// Last dot reached; starts at 1.
    current: usize,
    drag: Option<Drag>,
    errors: u32,
    flashes: Vec<ErrorFlash>,
    next_flash: u64,
    started_at: Option<Millis>,
    finished_at: Option<Millis>,
    tasks: TaskQueue<TrailTask>,
}

impl TrailGame {
    /// Validate `config` and place the dots.
    pub fn new(config: TrailConfig, mut rng: GameRng) -> Result<Self> {
        config.validate()?;
        let layout = DotLayout::generate(&config, &mut rng);
        Self::with_layout(config, layout)
    }

    /// Engine over a prepared layout. `dot_count` follows the layout, so a
    /// layout with fewer than two dots is rejected.
    pub fn with_layout(config: TrailConfig, layout: DotLayout) -> Result<Self> {
        let config = TrailConfig {
            dot_count: layout.len(),
            ..config
        };
        config.validate()?;
        Ok(Self {
            config,
            layout,
            phase: TrailPhase::AwaitingStart,
            current: 1,
            drag: None,
            errors: 0,
            flashes: Vec::new(),
            next_flash: 0,
            started_at: None,
            finished_at: None,
            tasks: TaskQueue::new(),
        })
    }

    #[must_use]
    pub fn phase(&self) -> TrailPhase {
        self.phase
    }

    #[must_use]
    pub fn layout(&self) -> &DotLayout {
        &self.layout
    }

    /// Last dot reached.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Error segments currently shown.
    #[must_use]
    pub fn flashes(&self) -> &[ErrorFlash] {
        &self.flashes
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Seconds since the first press on dot 1 (frozen at completion).
    #[must_use]
    pub fn elapsed_seconds(&self, now: Millis) -> f64 {
        match self.started_at {
            Some(start) => self.finished_at.unwrap_or(now).seconds_since(start),
            None => 0.0,
        }
    }

    fn pointer_down(&mut self, p: Point, now: Millis) {
        if self.phase == TrailPhase::Completed || !self.layout.hits(self.current, p, self.config.dot_radius) {
            return;
        }
        self.drag = Some(Drag {
            origin: self.current,
            pointer: p,
        });
        if self.started_at.is_none() {
            self.started_at = Some(now);
            self.phase = TrailPhase::Tracing;
        }
    }

    fn pointer_up(&mut self, p: Point, now: Millis) -> Option<GameResults> {
        let drag = self.drag.take()?;
        if self.phase != TrailPhase::Tracing {
            return None;
        }

        let next = self.current + 1;
        if self.layout.hits(next, p, self.config.dot_radius) {
            self.current = next;
            if self.current == self.layout.len() {
                return Some(self.complete(now));
            }
            return None;
        }

        let target = self.layout.dot_at(p, self.config.dot_radius)?.number;
        if target == drag.origin {
            return None;
        }
        self.errors += 1;
        let id = self.next_flash;
        self.next_flash += 1;
        self.flashes.push(ErrorFlash {
            id,
            from: drag.origin,
            to: target,
        });
        self.tasks.schedule(now, self.config.error_flash, TrailTask::ClearError(id));
        tracing::trace!(from = drag.origin, to = target, errors = self.errors, "wrong connection");
        None
    }

    fn complete(&mut self, now: Millis) -> GameResults {
        self.phase = TrailPhase::Completed;
        self.finished_at = Some(now);
        self.tasks.cancel_all();
        self.flashes.clear();

        let time = self.elapsed_seconds(now);
        tracing::debug!(time, errors = self.errors, "trail completed");
        GameResults::Trail(TrailResults {
            time,
            errors: self.errors,
        })
    }

    fn center(&self, number: usize) -> Option<Point> {
        self.layout.get(number).map(|d| d.center)
    }
}

impl GameEngine for TrailGame {
    fn kind(&self) -> GameKind {
        GameKind::Trail
    }

    fn start(&mut self, _now: Millis) {}

    fn handle_input(&mut self, event: &InputEvent, now: Millis) -> Option<GameResults> {
        match *event {
            InputEvent::PointerDown(p) => {
                self.pointer_down(p, now);
                None
            }
            InputEvent::PointerMove(p) => {
                if let Some(drag) = &mut self.drag {
                    drag.pointer = p;
                }
                None
            }
            InputEvent::PointerUp(p) => self.pointer_up(p, now),
            InputEvent::KeyDown(_) => None,
        }
    }

    fn advance(&mut self, now: Millis) -> Option<GameResults> {
        while let Some((_, task)) = self.tasks.pop_due(now) {
            match task {
                TrailTask::ClearError(id) => self.flashes.retain(|f| f.id != id),
            }
        }
        None
    }

    fn reset(&mut self, _now: Millis) {
        self.tasks.cancel_all();
        self.phase = TrailPhase::AwaitingStart;
        self.current = 1;
        self.drag = None;
        self.errors = 0;
        self.flashes.clear();
        self.started_at = None;
        self.finished_at = None;
    }

    fn render(&self, surface: &mut dyn Surface, now: Millis) {
        for reached in 2..=self.current {
            if let (Some(a), Some(b)) = (self.center(reached - 1), self.center(reached)) {
                surface.line(a, b, LINE_WIDTH, Color::INK);
            }
        }
        for flash in &self.flashes {
            if let (Some(a), Some(b)) = (self.center(flash.from), self.center(flash.to)) {
                surface.line(a, b, LINE_WIDTH, Color::ERROR);
            }
        }
        if let Some(drag) = &self.drag {
            if let Some(origin) = self.center(drag.origin) {
                surface.line(origin, drag.pointer, LINE_WIDTH, Color::INK);
            }
        }

        for dot in self.layout.dots() {
            let (fill, alpha) = match dot.number.cmp(&self.current) {
                std::cmp::Ordering::Less => (Color::SUCCESS, 1.0),
                std::cmp::Ordering::Equal if self.phase == TrailPhase::Completed => (Color::SUCCESS, 1.0),
                std::cmp::Ordering::Equal => (Color::PRIMARY, 1.0),
                std::cmp::Ordering::Greater => (Color::PRIMARY, FUTURE_ALPHA),
            };
            surface.draw(DrawCommand::Circle {
                center: dot.center,
                radius: self.config.dot_radius,
                fill,
                alpha,
            });
            surface.text(dot.center, &dot.number.to_string(), 16.0, Color::WHITE);
        }

        let below = self.config.grid_size + 24.0;
        match self.phase {
            TrailPhase::Completed => {
                surface.text(Point::new(0.0, below), "Completed!", 16.0, Color::SUCCESS);
                surface.text(
                    Point::new(0.0, below + 20.0),
                    &format!("Time: {:.1} seconds  Errors: {}", self.elapsed_seconds(now), self.errors),
                    14.0,
                    Color::INK,
                );
            }
            _ => surface.text(
                Point::new(0.0, below),
                "Connect the dots in numerical order (1→2→3...)",
                16.0,
                Color::INK,
            ),
        }
    }

    fn results(&self, now: Millis) -> GameResults {
        GameResults::Trail(TrailResults {
            time: self.elapsed_seconds(now),
            errors: self.errors,
        })
    }

    fn is_complete(&self) -> bool {
        self.phase == TrailPhase::Completed
    }

    fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }
}
