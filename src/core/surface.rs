//! Rendering surface consumed by the engines.
//!
//! Engines never talk to a concrete drawing API. They emit `DrawCommand`s
//! into a `Surface`, which hosts implement on top of whatever canvas they
//! have. `DisplayList` is a retained implementation: it stores the commands
//! of the last frame so a host can replay them (and tests can inspect them).

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};

/// An RGB colour, `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const PRIMARY: Color = Color(0x57B5E7);
    pub const TEAL: Color = Color(0x8DD3C7);
    pub const CORAL: Color = Color(0xFF9F7F);
    pub const SUCCESS: Color = Color(0x4CAF50);
    pub const ERROR: Color = Color(0xF44336);
    pub const INK: Color = Color(0x333333);
    pub const MUTED: Color = Color(0x666666);
    pub const BORDER: Color = Color(0xDDDDDD);
    pub const BACKGROUND: Color = Color(0xF9FAFB);
    pub const WHITE: Color = Color(0xFFFFFF);

    /// Red, green, blue components.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// A primitive draw operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Color,
        /// Opacity in `[0, 1]`.
        alpha: f64,
    },
    Ring {
        center: Point,
        radius: f64,
        width: f64,
        color: Color,
    },
    Rect {
        rect: Rect,
        fill: Color,
        /// Optional outline colour.
        stroke: Option<Color>,
    },
    Polygon {
        points: Vec<Point>,
        fill: Color,
    },
    Text {
        at: Point,
        text: String,
        size: f64,
        color: Color,
    },
}

/// A drawable region.
pub trait Surface {
    /// Bounding geometry in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Remove everything drawn so far.
    fn clear(&mut self);

    /// Draw one primitive.
    fn draw(&mut self, command: DrawCommand);

    // === Convenience Methods ===

    fn line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.draw(DrawCommand::Line { from, to, width, color });
    }

    fn circle(&mut self, center: Point, radius: f64, fill: Color) {
        self.draw(DrawCommand::Circle { center, radius, fill, alpha: 1.0 });
    }

    fn fill_rect(&mut self, rect: Rect, fill: Color) {
        self.draw(DrawCommand::Rect { rect, fill, stroke: None });
    }

    fn text(&mut self, at: Point, text: &str, size: f64, color: Color) {
        self.draw(DrawCommand::Text { at, text: text.to_string(), size, color });
    }
}

/// Retained list of draw commands for one frame.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    bounds: Rect,
    commands: Vec<DrawCommand>,
    clears: u32,
}

impl DisplayList {
    /// Create an empty list for a region of the given size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            commands: Vec::new(),
            clears: 0,
        }
    }

    /// Commands drawn since the last clear.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// How many times the surface has been cleared.
    #[must_use]
    pub fn clear_count(&self) -> u32 {
        self.clears
    }

    /// All text drawn since the last clear.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any drawn text contains `needle`.
    #[must_use]
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    /// Count the lines drawn in a given colour.
    #[must_use]
    pub fn count_lines(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color: lc, .. } if *lc == color))
            .count()
    }
}

impl Surface for DisplayList {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
