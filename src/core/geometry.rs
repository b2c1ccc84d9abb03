//! Surface-space geometry shared by the engines.
//!
//! ## Angle Convention
//!
//! Angles are in degrees with 0° pointing horizontally right and increasing
//! clockwise (screen space, y grows downward). A clock's 12 o'clock therefore
//! sits at -90° ≡ 270°.

use serde::{Deserialize, Serialize};

/// A point in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of `self` as seen from `pivot`, normalized to `[0, 360)`.
    #[must_use]
    pub fn angle_from(self, pivot: Point) -> f64 {
        normalize_degrees((self.y - pivot.y).atan2(self.x - pivot.x).to_degrees())
    }

    /// The point at `angle` degrees and `length` away from `self`.
    #[must_use]
    pub fn polar(self, angle: f64, length: f64) -> Point {
        let radians = angle.to_radians();
        Point::new(self.x + length * radians.cos(), self.y + length * radians.sin())
    }

    /// Shortest distance from `self` to the segment `a`–`b`.
    #[must_use]
    pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A `size`×`size` square anchored at the origin.
    #[must_use]
    pub const fn square(size: f64) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Shortest-arc distance between two angles, in `[0, 180]`.
#[must_use]
pub fn circular_difference(a: f64, b: f64) -> f64 {
    ((a - b + 180.0).rem_euclid(360.0) - 180.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance() {
        assert!((Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_angle_from_screen_convention() {
        let c = Point::new(100.0, 100.0);
        assert!((Point::new(150.0, 100.0).angle_from(c) - 0.0).abs() < EPS);
        assert!((Point::new(100.0, 150.0).angle_from(c) - 90.0).abs() < EPS);
        assert!((Point::new(50.0, 100.0).angle_from(c) - 180.0).abs() < EPS);
        // Straight up is 12 o'clock
        assert!((Point::new(100.0, 50.0).angle_from(c) - 270.0).abs() < EPS);
    }

    #[test]
    fn test_polar_inverts_angle_from() {
        let c = Point::new(10.0, 20.0);
        for angle in [0.0, 33.0, 145.0, 270.0, 359.0] {
            let p = c.polar(angle, 50.0);
            assert!((p.angle_from(c) - angle).abs() < 1e-6);
            assert!((p.distance(c) - 50.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((Point::new(5.0, 3.0).distance_to_segment(a, b) - 3.0).abs() < EPS);
        assert!((Point::new(13.0, 4.0).distance_to_segment(a, b) - 5.0).abs() < EPS);
        assert!((Point::new(1.0, 1.0).distance_to_segment(a, a) - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(r.contains(Point::new(15.0, 12.0)));
        assert!(!r.contains(Point::new(5.0, 12.0)));
        assert_eq!(r.center(), Point::new(20.0, 12.5));
    }

    #[test]
    fn test_circular_difference() {
        assert!((circular_difference(10.0, 350.0) - 20.0).abs() < EPS);
        assert!((circular_difference(-40.0, 320.0)).abs() < EPS);
        assert!((circular_difference(0.0, 180.0) - 180.0).abs() < EPS);
        assert!((circular_difference(-400.0, 0.0) - 40.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }
}
