//! N-back session: Idle → Running (presenting | gap) → Completed.
//!
//! ## Timeline
//!
//! `start` schedules the first stimulus after the lead-in delay. Each
//! stimulus stays up for `stimulus_duration`, then the stage is blank for
//! `inter_stimulus_interval` before the next index. Showing past the last
//! index completes the session. Exactly one presentation task is pending
//! while running, so stimuli never overlap.

use crate::core::{
    Color, DrawCommand, GameKind, GameResults, GameRng, InputEvent, Key, Millis, NBackConfig, NBackScore, Point, Rect,
    Result, Surface, TaskQueue, TaskToken,
};
use crate::games::GameEngine;

use super::sequence::{Shape, StimulusSequence};

/// Side of the square stimulus stage.
const STAGE: f64 = 300.0;

/// Region that accepts a pointer-down as a match press.
pub const MATCH_BUTTON: Rect = Rect {
    x: 75.0,
    y: STAGE + 20.0,
    width: 150.0,
    height: 48.0,
};

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NBackPhase {
    Idle,
    /// Lead-in or presentation under way.
    Running,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NBackTask {
    ShowNext,
    Blank,
    ClearFeedback,
}

/// Transient response flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
}

/// N-back working-memory engine.
#[derive(Clone, Debug)]
pub struct NBackGame {
    config: NBackConfig,
    rng: GameRng,
    /// Fixed sequence replayed on every session instead of a random one.
    scripted: Option<StimulusSequence>,
    phase: NBackPhase,
    sequence: Option<StimulusSequence>,
    index: Option<usize>,
    visible: bool,
    responded: Vec<bool>,
    correct: u32,
    incorrect: u32,
    matches_shown: u32,
    final_score: Option<NBackScore>,
    feedback: Option<Feedback>,
    /// Pending clear for the flash on screen.
    feedback_clear: Option<TaskToken>,
    tasks: TaskQueue<NBackTask>,
}

impl NBackGame {
    /// Create an idle engine. Fails on an invalid configuration.
    pub fn new(config: NBackConfig, rng: GameRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            scripted: None,
            phase: NBackPhase::Idle,
            sequence: None,
            index: None,
            visible: false,
            responded: Vec::new(),
            correct: 0,
            incorrect: 0,
            matches_shown: 0,
            final_score: None,
            feedback: None,
            feedback_clear: None,
            tasks: TaskQueue::new(),
        })
    }

    /// Engine that presents `shapes` instead of drawing a random sequence.
    pub fn with_sequence(config: NBackConfig, shapes: Vec<Shape>) -> Result<Self> {
        let config = NBackConfig {
            sequence_length: shapes.len(),
            ..config
        };
        let n = config.n_value;
        let mut game = Self::new(config, GameRng::new(0))?;
        game.scripted = Some(StimulusSequence::from_shapes(shapes, n));
        Ok(game)
    }

    #[must_use]
    pub fn phase(&self) -> NBackPhase {
        self.phase
    }

    #[must_use]
    pub fn sequence(&self) -> Option<&StimulusSequence> {
        self.sequence.as_ref()
    }

    /// Index of the stimulus most recently shown.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Shape on the stage right now, if any.
    #[must_use]
    pub fn current_stimulus(&self) -> Option<Shape> {
        if !self.visible {
            return None;
        }
        self.sequence.as_ref()?.get(self.index?)
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Register a match response.
    ///
    /// Returns `Some(correct)` if the press was counted. Presses outside a
    /// displayed stimulus, before index `n`, or repeated on the same index
    /// are ignored.
    pub fn press_match(&mut self, now: Millis) -> Option<bool> {
        if self.phase != NBackPhase::Running || !self.visible {
            return None;
        }
        let index = self.index?;
        let sequence = self.sequence.as_ref()?;
        if index < sequence.n() || self.responded[index] {
            return None;
        }
        self.responded[index] = true;

        let correct = sequence.is_match(index);
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }

        // A new flash replaces the old one and restarts its timer
        if let Some(token) = self.feedback_clear.take() {
            self.tasks.cancel(token);
        }
        self.feedback = Some(Feedback { correct });
        self.feedback_clear = Some(self.tasks.schedule(now, self.config.feedback_duration, NBackTask::ClearFeedback));
        tracing::trace!(index, correct, "match response");
        Some(correct)
    }

    fn show_next(&mut self, due: Millis) -> Option<GameResults> {
        let next = self.index.map_or(0, |i| i + 1);
        let sequence = self.sequence.as_ref()?;
        if next >= sequence.len() {
            return Some(self.complete());
        }
        if sequence.is_match(next) {
            self.matches_shown += 1;
        }
        self.index = Some(next);
        self.visible = true;
        self.tasks.schedule(due, self.config.stimulus_duration, NBackTask::Blank);
        None
    }

    fn complete(&mut self) -> GameResults {
        self.phase = NBackPhase::Completed;
        self.visible = false;
        self.feedback = None;
        self.feedback_clear = None;
        self.tasks.cancel_all();

        let total = self.sequence.as_ref().map_or(0, |s| s.true_matches() as u32);
        let score = score(self.correct, self.incorrect, total);
        tracing::debug!(
            correct = score.correct,
            incorrect = score.incorrect,
            missed = score.missed,
            percentage = score.percentage_score,
            "n-back completed"
        );
        self.final_score = Some(score);
        GameResults::NBack(score)
    }

    fn clear_session(&mut self) {
        self.sequence = None;
        self.index = None;
        self.visible = false;
        self.responded.clear();
        self.correct = 0;
        self.incorrect = 0;
        self.matches_shown = 0;
        self.final_score = None;
        self.feedback = None;
        self.feedback_clear = None;
    }

    fn draw_shape(surface: &mut dyn Surface, shape: Shape) {
        let center = Point::new(STAGE / 2.0, STAGE / 2.0);
        let size = STAGE * 0.3;
        let color = shape.color();
        match shape {
            Shape::Square => surface.fill_rect(
                Rect::new(center.x - size / 2.0, center.y - size / 2.0, size, size),
                color,
            ),
            Shape::Circle => surface.circle(center, size / 2.0, color),
            Shape::Triangle => surface.draw(DrawCommand::Polygon {
                points: vec![
                    Point::new(center.x, center.y - size / 2.0),
                    Point::new(center.x + size / 2.0, center.y + size / 2.0),
                    Point::new(center.x - size / 2.0, center.y + size / 2.0),
                ],
                fill: color,
            }),
        }
    }
}

/// Final tallies. `missed` is every true match not answered correctly.
fn score(correct: u32, incorrect: u32, total: u32) -> NBackScore {
    let percentage_score = if total == 0 {
        0
    } else {
        (f64::from(correct) / f64::from(total) * 100.0).round() as u32
    };
    NBackScore {
        correct,
        incorrect,
        missed: total.saturating_sub(correct),
        total,
        percentage_score,
    }
}

impl GameEngine for NBackGame {
    fn kind(&self) -> GameKind {
        GameKind::NBack
    }

    fn start(&mut self, now: Millis) {
        if self.phase != NBackPhase::Idle {
            return;
        }
        let sequence = match &self.scripted {
            Some(scripted) => scripted.clone(),
            None => {
                let mut sequence_rng = self.rng.fork();
                StimulusSequence::generate(self.config.sequence_length, self.config.n_value, &mut sequence_rng)
            }
        };
        self.responded = vec![false; sequence.len()];
        self.sequence = Some(sequence);
        self.phase = NBackPhase::Running;
        self.tasks.schedule(now, self.config.start_delay, NBackTask::ShowNext);
    }

    fn handle_input(&mut self, event: &InputEvent, now: Millis) -> Option<GameResults> {
        match *event {
            InputEvent::KeyDown(Key::Space) => {
                self.press_match(now);
            }
            InputEvent::PointerDown(p) if MATCH_BUTTON.contains(p) => {
                self.press_match(now);
            }
            InputEvent::KeyDown(Key::Enter) if self.phase != NBackPhase::Running => {
                if self.phase == NBackPhase::Completed {
                    self.reset(now);
                }
                self.start(now);
            }
            _ => {}
        }
        None
    }

    fn advance(&mut self, now: Millis) -> Option<GameResults> {
        while let Some((due, task)) = self.tasks.pop_due(now) {
            match task {
                NBackTask::ShowNext => {
                    if let Some(results) = self.show_next(due) {
                        return Some(results);
                    }
                }
                NBackTask::Blank => {
                    self.visible = false;
                    self.tasks.schedule(due, self.config.inter_stimulus_interval, NBackTask::ShowNext);
                }
                NBackTask::ClearFeedback => {
                    self.feedback = None;
                    self.feedback_clear = None;
                }
            }
        }
        None
    }

    fn reset(&mut self, _now: Millis) {
        self.tasks.cancel_all();
        self.clear_session();
        self.phase = NBackPhase::Idle;
    }

    fn render(&self, surface: &mut dyn Surface, _now: Millis) {
        surface.draw(DrawCommand::Rect {
            rect: Rect::square(STAGE),
            fill: Color::BACKGROUND,
            stroke: Some(Color::BORDER),
        });

        match self.phase {
            NBackPhase::Idle => {
                surface.text(
                    Point::new(20.0, STAGE / 2.0),
                    &format!("{}-back: press Enter to start", self.config.n_value),
                    16.0,
                    Color::INK,
                );
            }
            NBackPhase::Running => {
                if let Some(shape) = self.current_stimulus() {
                    Self::draw_shape(surface, shape);
                }
            }
            NBackPhase::Completed => {
                if let Some(score) = &self.final_score {
                    surface.text(
                        Point::new(20.0, STAGE / 2.0),
                        &format!("Score: {}%", score.percentage_score),
                        20.0,
                        Color::INK,
                    );
                    surface.text(
                        Point::new(20.0, STAGE / 2.0 + 28.0),
                        &format!(
                            "Correct: {}  Incorrect: {}  Missed: {}",
                            score.correct, score.incorrect, score.missed
                        ),
                        14.0,
                        Color::MUTED,
                    );
                }
            }
        }

        let button = match self.feedback {
            Some(Feedback { correct: true, .. }) => Color::SUCCESS,
            Some(Feedback { correct: false, .. }) => Color::ERROR,
            None => Color::PRIMARY,
        };
        surface.fill_rect(MATCH_BUTTON, button);
        surface.text(
            Point::new(MATCH_BUTTON.x + 44.0, MATCH_BUTTON.y + 30.0),
            "Match!",
            16.0,
            Color::WHITE,
        );
    }

    fn results(&self, _now: Millis) -> GameResults {
        let score = self.final_score.unwrap_or(NBackScore {
            correct: self.correct,
            incorrect: self.incorrect,
            missed: 0,
            total: self.matches_shown,
            percentage_score: 0,
        });
        GameResults::NBack(score)
    }

    fn is_complete(&self) -> bool {
        self.phase == NBackPhase::Completed
    }

    fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DisplayList;
    use Shape::{Circle, Square, Triangle};

    // Lead-in 1000, stimulus 1500, gap 500: index i is up over
    // [1000 + 2000 i, 2500 + 2000 i).
    fn shown_at(i: u64) -> Millis {
        Millis(1000 + 2000 * i)
    }

    fn scripted(shapes: Vec<Shape>, n: usize) -> NBackGame {
        NBackGame::with_sequence(NBackConfig::default().with_n(n), shapes).unwrap()
    }

    fn run_to_end(game: &mut NBackGame) -> Option<GameResults> {
        game.advance(Millis(1_000_000))
    }

    #[test]
    fn test_single_correct_press() {
        let mut game = scripted(vec![Square, Circle, Circle, Triangle], 1);
        game.start(Millis(0));

        game.advance(shown_at(2));
        assert_eq!(game.index(), Some(2));
        assert_eq!(game.current_stimulus(), Some(Circle));
        assert_eq!(game.press_match(shown_at(2)), Some(true));

        let results = run_to_end(&mut game);
        assert_eq!(
            results,
            Some(GameResults::NBack(NBackScore {
                correct: 1,
                incorrect: 0,
                missed: 0,
                total: 1,
                percentage_score: 100,
            }))
        );
        assert!(game.is_complete());
        assert_eq!(game.pending_tasks(), 0);
    }

    #[test]
    fn test_no_presses_counts_missed() {
        let mut game = scripted(vec![Square, Circle, Circle, Triangle, Triangle], 1);
        game.start(Millis(0));
        let Some(GameResults::NBack(score)) = run_to_end(&mut game) else {
            panic!("expected n-back results");
        };
        assert_eq!(score.total, 2);
        assert_eq!(score.missed, 2);
        assert_eq!(score.percentage_score, 0);
    }

    #[test]
    fn test_no_true_matches_scores_zero() {
        let mut game = scripted(vec![Square, Circle, Triangle], 1);
        game.start(Millis(0));
        game.advance(shown_at(1));
        assert_eq!(game.press_match(shown_at(1)), Some(false));
        let Some(GameResults::NBack(score)) = run_to_end(&mut game) else {
            panic!("expected n-back results");
        };
        assert_eq!(score.total, 0);
        assert_eq!(score.incorrect, 1);
        assert_eq!(score.percentage_score, 0);
    }

    #[test]
    fn test_press_rules() {
        let mut game = scripted(vec![Square, Square, Square, Circle], 2);
        game.start(Millis(0));

        // Lead-in: nothing displayed
        assert_eq!(game.press_match(Millis(500)), None);

        // Index below n
        game.advance(shown_at(1));
        assert_eq!(game.press_match(shown_at(1)), None);

        // Gap after index 1
        game.advance(Millis(4600));
        assert_eq!(game.current_stimulus(), None);
        assert_eq!(game.press_match(Millis(4600)), None);

        // Index 2 matches index 0; second press ignored
        game.advance(shown_at(2));
        assert_eq!(game.press_match(shown_at(2)), Some(true));
        assert_eq!(game.press_match(shown_at(2)), None);

        game.advance(shown_at(3));
        assert_eq!(game.press_match(shown_at(3)), Some(false));

        let Some(GameResults::NBack(score)) = run_to_end(&mut game) else {
            panic!("expected n-back results");
        };
        assert_eq!((score.correct, score.incorrect, score.total), (1, 1, 1));
    }

    #[test]
    fn test_feedback_flash_clears() {
        let mut game = scripted(vec![Square, Square, Circle], 1);
        game.start(Millis(0));
        game.advance(shown_at(1));
        game.press_match(shown_at(1));
        assert!(game.feedback().is_some_and(|f| f.correct));

        game.advance(shown_at(1).after(299));
        assert!(game.feedback().is_some());
        game.advance(shown_at(1).after(300));
        assert!(game.feedback().is_none());
    }

    #[test]
    fn test_new_press_restarts_feedback_flash() {
        // Stimulus 100, gap 50: index i is up from 1000 + 150 i
        let config = NBackConfig::default().with_n(1).with_timing(100, 50);
        let mut game = NBackGame::with_sequence(config, vec![Square, Square, Circle, Triangle]).unwrap();
        game.start(Millis(0));

        game.advance(Millis(1150));
        assert_eq!(game.press_match(Millis(1150)), Some(true));
        game.advance(Millis(1300));
        assert_eq!(game.press_match(Millis(1300)), Some(false));
        assert_eq!(game.pending_tasks(), 2, "one presentation task, one flash clear");

        // The first flash's clear was cancelled with it
        game.advance(Millis(1450));
        assert!(game.feedback().is_some_and(|f| !f.correct));
        game.advance(Millis(1600));
        assert!(game.feedback().is_none());
    }

    #[test]
    fn test_space_and_button_trigger_match() {
        let mut game = scripted(vec![Square, Square, Circle, Circle], 1);
        game.start(Millis(0));

        game.advance(shown_at(1));
        game.handle_input(&InputEvent::KeyDown(Key::Space), shown_at(1));
        game.advance(shown_at(3));
        game.handle_input(&InputEvent::PointerDown(MATCH_BUTTON.center()), shown_at(3));

        assert_eq!(
            game.results(shown_at(3)),
            GameResults::NBack(NBackScore {
                correct: 2,
                incorrect: 0,
                missed: 0,
                total: 2,
                percentage_score: 0,
            })
        );
    }

    #[test]
    fn test_reset_cancels_presentation() {
        let mut game = NBackGame::new(NBackConfig::default(), GameRng::new(5)).unwrap();
        game.start(Millis(0));
        game.advance(shown_at(3));
        assert_eq!(game.index(), Some(3));

        game.reset(shown_at(3));
        assert_eq!(game.phase(), NBackPhase::Idle);
        assert_eq!(game.pending_tasks(), 0);
        assert!(game.advance(Millis(1_000_000)).is_none());
        assert_eq!(game.index(), None);

        game.start(Millis(100_000));
        game.advance(Millis(101_000));
        assert_eq!(game.index(), Some(0));
    }

    #[test]
    fn test_random_session_forced_match_density() {
        let mut game = NBackGame::new(NBackConfig::default().with_n(2), GameRng::new(17)).unwrap();
        game.start(Millis(0));
        let sequence = game.sequence().unwrap();
        assert_eq!(sequence.len(), 20);
        assert!(sequence.true_matches() >= NBackConfig::default().with_n(2).forced_matches());
    }

    #[test]
    fn test_completion_fires_once_at_end_of_sequence() {
        let mut game = scripted(vec![Square, Circle], 1);
        game.start(Millis(0));
        // The gap after the last stimulus ends at 1000 + 2000 * 2
        assert!(game.advance(Millis(4999)).is_none());
        assert!(game.advance(Millis(5000)).is_some());
        assert!(game.advance(Millis(10_000)).is_none());
    }

    #[test]
    fn test_render_states() {
        let mut game = scripted(vec![Circle, Circle], 1);
        let mut surface = DisplayList::new(300.0, 400.0);
        game.render(&mut surface, Millis(0));
        assert!(surface.has_text("1-back: press Enter to start"));
        assert!(surface.has_text("Match!"));

        game.handle_input(&InputEvent::KeyDown(Key::Enter), Millis(0));
        game.advance(shown_at(0));
        surface.clear();
        game.render(&mut surface, shown_at(0));
        assert!(surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Circle { fill, .. } if *fill == Color::TEAL)));

        run_to_end(&mut game);
        surface.clear();
        game.render(&mut surface, Millis(1_000_000));
        assert!(surface.has_text("Score: 0%"));
    }
}
