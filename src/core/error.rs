//! Error types.
//!
//! Only configuration problems and persistence failures are errors. Input
//! that matches no valid transition is silently ignored by the engines, and
//! generation fallbacks are a normal code path.

use super::record::GameKind;

/// Errors surfaced to the host.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("unsupported game: {0}")]
    UnsupportedGame(String),

    #[error("invalid {game} configuration: {reason}")]
    InvalidConfig { game: GameKind, reason: String },

    #[error("invalid target time {0:?}, expected HH:MM")]
    InvalidTargetTime(String),

    #[error("unknown or expired game session")]
    UnknownSession,

    #[error("record log persistence failed: {0}")]
    Persistence(#[from] serde_json::Error),
}

impl GameError {
    pub(crate) fn config(game: GameKind, reason: impl Into<String>) -> Self {
        GameError::InvalidConfig {
            game,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GameError::UnsupportedGame("chess".into());
        assert_eq!(err.to_string(), "unsupported game: chess");

        let err = GameError::config(GameKind::Maze, "width must be at least 4");
        assert_eq!(err.to_string(), "invalid maze configuration: width must be at least 4");

        let err = GameError::InvalidTargetTime("25:00".into());
        assert!(err.to_string().contains("\"25:00\""));
    }
}
