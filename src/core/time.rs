//! Time source consumed by the engines.
//!
//! Engines receive the current time as a `Millis` argument rather than reading
//! a clock themselves; only the controller owns a `TimeSource`.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Monotonic milliseconds since an arbitrary, per-source origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    #[must_use]
    pub const fn new(ms: u64) -> Self {
        Self(ms)
    }

    /// `self + ms`, saturating.
    #[must_use]
    pub const fn after(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier` (zero if `earlier` is later).
    #[must_use]
    pub const fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Seconds elapsed since `earlier`, as a fraction.
    #[must_use]
    pub fn seconds_since(self, earlier: Millis) -> f64 {
        self.since(earlier) as f64 / 1000.0
    }
}

impl std::fmt::Display for Millis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Format whole seconds as `MM:SS`.
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// A monotonic clock plus a wall clock for record timestamps.
pub trait TimeSource {
    /// Monotonic reading.
    fn now(&self) -> Millis;

    /// Wall-clock time, used to stamp result records.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Real time.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_millis() as u64)
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same reading.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
    epoch: DateTime<Utc>,
}

impl ManualClock {
    /// A clock at zero whose wall time starts at the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::with_epoch(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// A clock at zero whose wall time starts at `epoch`.
    #[must_use]
    pub fn with_epoch(epoch: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            epoch,
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    /// Jump to an absolute reading. Never moves backwards.
    pub fn set(&self, at: Millis) {
        self.now.set(self.now.get().max(at.0));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now.get())
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.epoch + Duration::milliseconds(self.now.get() as i64)
    }
}
