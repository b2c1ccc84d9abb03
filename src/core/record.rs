//! Normalized session results and the bounded record log.
//!
//! ## Record Shape
//!
//! Every completed session produces one `ResultRecord`:
//!
//! ```json
//! { "game": "nback",
//!   "results": { "correct": 3, "incorrect": 1, "missed": 0, "total": 3, "percentageScore": 100 },
//!   "timestamp": "2024-05-01T10:00:00Z" }
//! ```
//!
//! The log keeps only the most recent `RECORD_CAPACITY` records, in append
//! order. It is the only state that outlives a single session.

use chrono::{DateTime, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// Maximum records retained by a `RecordLog`.
pub const RECORD_CAPACITY: usize = 50;

/// The four games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Clock,
    Trail,
    NBack,
    Maze,
}

impl GameKind {
    /// All games, in catalog order.
    pub const ALL: [GameKind; 4] = [GameKind::Clock, GameKind::Trail, GameKind::NBack, GameKind::Maze];

    /// The game identifier used by hosts.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            GameKind::Clock => "clock",
            GameKind::Trail => "trail",
            GameKind::NBack => "nback",
            GameKind::Maze => "maze",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for GameKind {
    type Err = GameError;

    /// Parse a game id, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnsupportedGame(s.to_string()))
    }
}

/// N-back tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NBackScore {
    /// Match presses on true match positions.
    pub correct: u32,
    /// Match presses on non-match positions.
    pub incorrect: u32,
    /// True match positions never pressed.
    pub missed: u32,
    /// True match positions in the sequence (so far, while running).
    pub total: u32,
    /// `correct / total * 100`, rounded; 0 when there are no true matches.
    pub percentage_score: u32,
}

/// Trail-making raw metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailResults {
    /// Seconds from the first touch on dot 1 to the last connection.
    pub time: f64,
    /// Releases on a wrong dot.
    pub errors: u32,
}

/// Game-specific results.
///
/// Serialized without a tag; the enclosing record's `game` field names the
/// variant. Variant order matters for deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameResults {
    NBack(NBackScore),
    Trail(TrailResults),
    /// Seconds to reach the exit.
    Maze { time: f64 },
    /// Weighted clock accuracy, 0–100.
    Clock { score: u32 },
}

impl GameResults {
    /// Which game produced these results.
    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            GameResults::NBack(_) => GameKind::NBack,
            GameResults::Trail(_) => GameKind::Trail,
            GameResults::Maze { .. } => GameKind::Maze,
            GameResults::Clock { .. } => GameKind::Clock,
        }
    }
}

/// One completed session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub game: GameKind,
    pub results: GameResults,
    pub timestamp: DateTime<Utc>,
}

impl ResultRecord {
    #[must_use]
    pub fn new(results: GameResults, timestamp: DateTime<Utc>) -> Self {
        Self {
            game: results.kind(),
            results,
            timestamp,
        }
    }
}

/// Where completed sessions are written.
pub trait ResultsSink {
    /// Append one record. Must not fail.
    fn append(&mut self, record: ResultRecord);
}

/// Append-only log bounded to the most recent records.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordLog {
    records: Vector<ResultRecord>,
    capacity: usize,
}

impl Default for RecordLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordLog {
    /// Key under which hosts persist the serialized log.
    pub const STORAGE_KEY: &'static str = "gameRecords";

    /// An empty log holding at most `RECORD_CAPACITY` records.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(RECORD_CAPACITY)
    }

    /// An empty log with a custom bound (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vector::new(),
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record.
    #[must_use]
    pub fn latest(&self) -> Option<&ResultRecord> {
        self.records.last()
    }

    /// Records in append order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    /// Records for one game, oldest first.
    pub fn for_game(&self, game: GameKind) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter().filter(move |r| r.game == game)
    }

    /// O(1) copy of the current contents for readers.
    #[must_use]
    pub fn snapshot(&self) -> Vector<ResultRecord> {
        self.records.clone()
    }

    /// Serialize as a JSON array, oldest first.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Load a JSON array produced by `to_json`, keeping the newest records
    /// if it holds more than the capacity.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ResultRecord> = serde_json::from_str(json)?;
        let mut log = Self::new();
        for record in records {
            log.append(record);
        }
        Ok(log)
    }
}

impl ResultsSink for RecordLog {
    fn append(&mut self, record: ResultRecord) {
        self.records.push_back(record);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }
}
