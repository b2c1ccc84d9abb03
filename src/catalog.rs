//! Static descriptions of the available games for host menus.

use serde::Serialize;

use crate::core::GameKind;

/// Presentation metadata for one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameDescription {
    pub title: &'static str,
    pub description: &'static str,
    pub skills: &'static [&'static str],
    pub duration: &'static str,
}

/// Ids of every game, in menu order.
#[must_use]
pub fn available_games() -> [&'static str; 4] {
    GameKind::ALL.map(GameKind::id)
}

/// Metadata for `game_id`, or `None` if it names no game.
#[must_use]
pub fn game_description(game_id: &str) -> Option<GameDescription> {
    game_id.parse::<GameKind>().ok().map(describe)
}

/// Metadata for a game.
#[must_use]
pub const fn describe(kind: GameKind) -> GameDescription {
    match kind {
        GameKind::Clock => GameDescription {
            title: "Clock Drawing Test",
            description: "Set the clock hands to show the requested time.",
            skills: &["Visuospatial abilities", "Executive function", "Fine motor skills"],
            duration: "1-2 minutes",
        },
        GameKind::Trail => GameDescription {
            title: "Trail Making Test",
            description: "Connect numbered dots in sequential order.",
            skills: &["Visual attention", "Task switching", "Processing speed"],
            duration: "1-3 minutes",
        },
        GameKind::NBack => GameDescription {
            title: "N-Back Memory Test",
            description: "Press the button when you see a shape that matches the one shown previously.",
            skills: &["Working memory", "Attention", "Cognitive control"],
            duration: "2-3 minutes",
        },
        GameKind::Maze => GameDescription {
            title: "Maze Navigation Task",
            description: "Navigate through the maze to reach the exit using arrow keys.",
            skills: &["Spatial navigation", "Planning", "Problem solving"],
            duration: "1-4 minutes",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_games() {
        assert_eq!(available_games(), ["clock", "trail", "nback", "maze"]);
    }

    #[test]
    fn test_descriptions() {
        let trail = game_description("trail").unwrap();
        assert_eq!(trail.title, "Trail Making Test");
        assert_eq!(trail.skills.len(), 3);
        assert_eq!(game_description("NBack").unwrap().duration, "2-3 minutes");
        assert!(game_description("solitaire").is_none());
        for id in available_games() {
            assert!(game_description(id).is_some());
        }
    }
}
