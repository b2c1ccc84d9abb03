//! Clock-setting session: Setting → Submitted.

use crate::core::{
    ClockConfig, Color, DrawCommand, GameKind, GameResults, InputEvent, Key, Millis, Point, Rect, Result, Surface,
};
use crate::games::GameEngine;

use super::angles::{AngleTarget, ClockTime, ScoreBand, TWELVE_O_CLOCK};

/// How far from a hand's shaft a press still grabs it.
const GRAB_TOLERANCE: f64 = 12.0;

/// Session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockPhase {
    /// Hands can be dragged.
    Setting,
    /// Scored; hands are locked until reset.
    Submitted,
}

/// One of the two draggable hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Hour,
    Minute,
}

impl Hand {
    /// Length as a fraction of the face radius.
    #[must_use]
    pub const fn length_ratio(self) -> f64 {
        match self {
            Hand::Hour => 0.5,
            Hand::Minute => 0.8,
        }
    }

    const fn width(self) -> f64 {
        match self {
            Hand::Hour => 8.0,
            Hand::Minute => 4.0,
        }
    }

    const fn color(self) -> Color {
        match self {
            Hand::Hour => Color::INK,
            Hand::Minute => Color::MUTED,
        }
    }
}

/// Clock-setting engine.
#[derive(Clone, Debug)]
pub struct ClockGame {
    config: ClockConfig,
    time: ClockTime,
    target: AngleTarget,
    hour_angle: f64,
    minute_angle: f64,
    dragging: Option<Hand>,
    phase: ClockPhase,
    score: Option<u32>,
}

impl ClockGame {
    /// Fails on a bad size or a target that is not `HH:MM`.
    pub fn new(config: ClockConfig) -> Result<Self> {
        config.validate()?;
        let time: ClockTime = config.target_time.parse()?;
        Ok(Self {
            config,
            time,
            target: AngleTarget::from(time),
            hour_angle: TWELVE_O_CLOCK,
            minute_angle: TWELVE_O_CLOCK,
            dragging: None,
            phase: ClockPhase::Setting,
            score: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    #[must_use]
    pub fn target(&self) -> AngleTarget {
        self.target
    }

    #[must_use]
    pub fn target_time(&self) -> ClockTime {
        self.time
    }

    #[must_use]
    pub fn angle(&self, hand: Hand) -> f64 {
        match hand {
            Hand::Hour => self.hour_angle,
            Hand::Minute => self.minute_angle,
        }
    }

    #[must_use]
    pub fn dragging(&self) -> Option<Hand> {
        self.dragging
    }

    /// Submitted score, if any.
    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    /// Score the hands as they stand now.
    #[must_use]
    pub fn current_score(&self) -> u32 {
        self.target.score(self.hour_angle, self.minute_angle)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        let r = self.radius();
        Point::new(r, r)
    }

    fn radius(&self) -> f64 {
        self.config.clock_size / 2.0
    }

    /// Tip of `hand` in surface coordinates.
    #[must_use]
    pub fn hand_tip(&self, hand: Hand) -> Point {
        self.center()
            .polar(self.angle(hand), self.radius() * hand.length_ratio())
    }

    /// Region that submits on a pointer-down.
    #[must_use]
    pub fn submit_button(&self) -> Rect {
        Rect::new(0.0, self.config.clock_size + 56.0, self.config.clock_size, 44.0)
    }

    /// Set a hand directly. Ignored once submitted.
    pub fn set_angle(&mut self, hand: Hand, angle: f64) {
        if self.phase == ClockPhase::Submitted {
            return;
        }
        let angle = crate::core::normalize_degrees(angle);
        match hand {
            Hand::Hour => self.hour_angle = angle,
            Hand::Minute => self.minute_angle = angle,
        }
    }

    /// Lock the hands and score them. `None` if already submitted.
    pub fn submit(&mut self) -> Option<GameResults> {
        if self.phase == ClockPhase::Submitted {
            return None;
        }
        let score = self.current_score();
        self.phase = ClockPhase::Submitted;
        self.dragging = None;
        self.score = Some(score);
        tracing::debug!(
            score,
            hour = self.hour_angle,
            minute = self.minute_angle,
            target = %self.time,
            "clock submitted"
        );
        Some(GameResults::Clock { score })
    }

    /// Hand whose shaft is nearest `p`, within grab tolerance. Overlapping
    /// shafts resolve to the hand whose tip is closer.
    fn grab(&self, p: Point) -> Option<Hand> {
        let center = self.center();
        [Hand::Hour, Hand::Minute]
            .into_iter()
            .map(|hand| {
                let tip = self.hand_tip(hand);
                (hand, p.distance_to_segment(center, tip), p.distance(tip))
            })
            .filter(|(_, shaft, _)| *shaft <= GRAB_TOLERANCE)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)))
            .map(|(hand, _, _)| hand)
    }
}

impl GameEngine for ClockGame {
    fn kind(&self) -> GameKind {
        GameKind::Clock
    }

    fn start(&mut self, _now: Millis) {}

    fn handle_input(&mut self, event: &InputEvent, _now: Millis) -> Option<GameResults> {
        match *event {
            InputEvent::KeyDown(Key::Enter) => self.submit(),
            InputEvent::PointerDown(p) if self.submit_button().contains(p) => self.submit(),
            InputEvent::PointerDown(p) if self.phase == ClockPhase::Setting => {
                self.dragging = self.grab(p);
                None
            }
            InputEvent::PointerMove(p) => {
                if let Some(hand) = self.dragging {
                    let angle = p.angle_from(self.center());
                    self.set_angle(hand, angle);
                }
                None
            }
            InputEvent::PointerUp(_) => {
                self.dragging = None;
                None
            }
            _ => None,
        }
    }

    fn advance(&mut self, _now: Millis) -> Option<GameResults> {
        None
    }

    fn reset(&mut self, _now: Millis) {
        self.hour_angle = TWELVE_O_CLOCK;
        self.minute_angle = TWELVE_O_CLOCK;
        self.dragging = None;
        self.phase = ClockPhase::Setting;
        self.score = None;
    }

    fn render(&self, surface: &mut dyn Surface, _now: Millis) {
        let center = self.center();
        let radius = self.radius();

        surface.circle(center, radius - 2.0, Color::WHITE);
        surface.draw(DrawCommand::Ring {
            center,
            radius: radius - 2.0,
            width: 2.0,
            color: Color::PRIMARY,
        });

        for i in 0..12u32 {
            let angle = TWELVE_O_CLOCK + f64::from(i) * 30.0;
            let major = i % 3 == 0;
            let inset = if major { 15.0 } else { 10.0 };
            surface.line(
                center.polar(angle, radius - inset),
                center.polar(angle, radius - 2.0),
                if major { 3.0 } else { 2.0 },
                Color::INK,
            );
            if major {
                let label = if i == 0 { 12 } else { i };
                surface.text(center.polar(angle, radius - 30.0), &label.to_string(), 18.0, Color::INK);
            }
        }

        for hand in [Hand::Hour, Hand::Minute] {
            surface.line(center, self.hand_tip(hand), hand.width(), hand.color());
        }
        surface.circle(center, 5.0, Color::INK);

        let size = self.config.clock_size;
        surface.text(
            Point::new(0.0, size + 24.0),
            &format!("Please set the clock to show {}", self.time.describe()),
            16.0,
            Color::INK,
        );

        let button = self.submit_button();
        let fill = match self.phase {
            ClockPhase::Setting => Color::PRIMARY,
            ClockPhase::Submitted => Color::BORDER,
        };
        surface.fill_rect(button, fill);
        surface.text(Point::new(button.x + size / 2.0 - 24.0, button.y + 28.0), "Submit", 16.0, Color::WHITE);

        if let Some(score) = self.score {
            let band = ScoreBand::from_score(score);
            let color = match band {
                ScoreBand::Excellent => Color::SUCCESS,
                ScoreBand::Good => Color::PRIMARY,
                ScoreBand::KeepPracticing => Color::CORAL,
            };
            surface.text(Point::new(0.0, button.y + 72.0), &format!("{}!", band.label()), 16.0, color);
            surface.text(Point::new(0.0, button.y + 92.0), &format!("Score: {score}"), 14.0, Color::INK);
        }
    }

    fn results(&self, _now: Millis) -> GameResults {
        GameResults::Clock {
            score: self.score.unwrap_or_else(|| self.current_score()),
        }
    }

    fn is_complete(&self) -> bool {
        self.phase == ClockPhase::Submitted
    }

    fn pending_tasks(&self) -> usize {
        0
    }
}
