//! Target times, hand angles and accuracy scoring.
//!
//! All angles follow the surface convention in [`crate::core::geometry`]:
//! degrees, 0° pointing right, clockwise, so 12 o'clock is 270°.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{circular_difference, normalize_degrees, GameError};

/// Angle of a hand pointing at 12.
pub const TWELVE_O_CLOCK: f64 = 270.0;

/// Weight of the hour hand in the combined score.
pub const HOUR_WEIGHT: f64 = 0.6;

/// Weight of the minute hand in the combined score.
pub const MINUTE_WEIGHT: f64 = 0.4;

/// A wall-clock time of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Angle the hour hand should show, including the minute drift.
    #[must_use]
    pub fn hour_angle(self) -> f64 {
        let hours = (f64::from(self.hour) + f64::from(self.minute) / 60.0) % 12.0;
        normalize_degrees(hours * 30.0 - 90.0)
    }

    #[must_use]
    pub fn minute_angle(self) -> f64 {
        normalize_degrees(f64::from(self.minute) * 6.0 - 90.0)
    }

    /// Phrase used in the on-screen instructions.
    #[must_use]
    pub fn describe(self) -> String {
        match (self.hour, self.minute) {
            (10, 10) => "10 past 10".to_string(),
            (10, 55) => "5 minutes to 11".to_string(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = GameError;

    /// Parse `H:MM` or `HH:MM` on a 24-hour clock.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidTargetTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self { hour, minute })
    }
}

/// The pair of target angles for one session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleTarget {
    pub hour: f64,
    pub minute: f64,
}

impl From<ClockTime> for AngleTarget {
    fn from(time: ClockTime) -> Self {
        Self {
            hour: time.hour_angle(),
            minute: time.minute_angle(),
        }
    }
}

impl AngleTarget {
    /// Weighted, rounded score for the given hand angles.
    #[must_use]
    pub fn score(&self, hour_angle: f64, minute_angle: f64) -> u32 {
        let combined =
            hand_accuracy(hour_angle, self.hour) * HOUR_WEIGHT + hand_accuracy(minute_angle, self.minute) * MINUTE_WEIGHT;
        combined.round() as u32
    }
}

/// 100 when on target, falling linearly to 0 at the opposite side.
#[must_use]
pub fn hand_accuracy(current: f64, target: f64) -> f64 {
    (100.0 - circular_difference(current, target) / 1.8).max(0.0)
}

/// Presentation band for a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    Excellent,
    Good,
    KeepPracticing,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => ScoreBand::Excellent,
            70..=89 => ScoreBand::Good,
            _ => ScoreBand::KeepPracticing,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::KeepPracticing => "Keep practicing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(time("10:10"), ClockTime { hour: 10, minute: 10 });
        assert_eq!(time("7:05"), ClockTime { hour: 7, minute: 5 });
        assert_eq!(time(" 23:59 "), ClockTime { hour: 23, minute: 59 });
        for bad in ["", "10", "24:00", "10:60", "1:5", "ab:cd", "10:10:10", "-1:10", "123:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn test_target_angles() {
        // 10:10 → hour hand a sixth of the way from 10 to 11
        let target = AngleTarget::from(time("10:10"));
        assert!((target.hour - 215.0).abs() < 1e-9);
        assert!((target.minute - 330.0).abs() < 1e-9);

        let noon = AngleTarget::from(time("12:00"));
        assert_eq!(noon.hour, TWELVE_O_CLOCK);
        assert_eq!(noon.minute, TWELVE_O_CLOCK);

        let three = AngleTarget::from(time("15:00"));
        assert_eq!(three.hour, 0.0);

        let half_past_six = AngleTarget::from(time("6:30"));
        assert!((half_past_six.hour - 105.0).abs() < 1e-9);
        assert_eq!(half_past_six.minute, 90.0);
    }

    #[test]
    fn test_exact_hands_score_full() {
        let target = AngleTarget::from(time("10:10"));
        assert_eq!(target.score(target.hour, target.minute), 100);
        // A full turn is the same position
        assert_eq!(target.score(target.hour + 360.0, target.minute - 360.0), 100);
    }

    #[test]
    fn test_opposite_hands_score_zero() {
        let target = AngleTarget::from(time("3:00"));
        assert_eq!(target.score(target.hour + 180.0, target.minute + 180.0), 0);
        assert_eq!(hand_accuracy(0.0, 180.0), 0.0);
    }

    #[test]
    fn test_weighting() {
        let target = AngleTarget::from(time("12:00"));
        // Hour perfect, minute opposite: 60
        assert_eq!(target.score(TWELVE_O_CLOCK, 90.0), 60);
        // Hour opposite, minute perfect: 40
        assert_eq!(target.score(90.0, TWELVE_O_CLOCK), 40);
        // 18° off on both hands: 90
        assert_eq!(target.score(288.0, 252.0), 90);
    }

    #[test]
    fn test_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(89), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(69).label(), "Keep practicing");
    }

    #[test]
    fn test_describe() {
        assert_eq!(time("10:10").describe(), "10 past 10");
        assert_eq!(time("10:55").describe(), "5 minutes to 11");
        assert_eq!(time("9:05").describe(), "09:05");
    }
}
