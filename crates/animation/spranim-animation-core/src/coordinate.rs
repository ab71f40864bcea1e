//! Immutable 2-D value type. Every operation returns a new value.
//!
//! Axes follow screen convention: x grows right, y grows down.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::interp::lerp_f64;

/// Serialized as `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    x: f64,
    y: f64,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn x(self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> f64 {
        self.y
    }

    pub fn with_x(self, x: f64) -> Self {
        Self { x, ..self }
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    pub fn translate(self, by: Coordinate) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }

    pub fn subtract(self, other: Coordinate) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    pub fn scale_xy(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Coordinate) -> f64 {
        self.subtract(other).magnitude()
    }

    /// Heading from `self` toward `other` in `[0, 2π)`, counter-clockwise on screen.
    pub fn angle_to(self, other: Coordinate) -> f64 {
        let dy = self.y - other.y;
        let dx = other.x - self.x;
        (dy.atan2(dx) + TAU) % TAU
    }

    /// Inclusive test against the box spanned by two corners, in either order.
    pub fn is_within(self, a: Coordinate, b: Coordinate) -> bool {
        let (lo, hi) = corners(a, b);
        self.x >= lo.x && self.x <= hi.x && self.y >= lo.y && self.y <= hi.y
    }

    /// Clamp each axis into the box spanned by two corners.
    pub fn move_within(self, a: Coordinate, b: Coordinate) -> Self {
        let (lo, hi) = corners(a, b);
        Self::new(self.x.clamp(lo.x, hi.x), self.y.clamp(lo.y, hi.y))
    }

    /// Component-wise linear blend. `t` is not clamped.
    pub fn interpolate(a: Coordinate, b: Coordinate, t: f64) -> Self {
        Self::new(lerp_f64(a.x, b.x, t), lerp_f64(a.y, b.y, t))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

fn corners(a: Coordinate, b: Coordinate) -> (Coordinate, Coordinate) {
    (
        Coordinate::new(a.x.min(b.x), a.y.min(b.y)),
        Coordinate::new(a.x.max(b.x), a.y.max(b.y)),
    )
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        c.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Coordinate::new(3.0, 4.0);
        let b = a.translate(Coordinate::new(1.0, -1.0));
        assert_eq!(a, Coordinate::new(3.0, 4.0));
        assert_eq!(b, Coordinate::new(4.0, 3.0));
        assert_eq!(b.subtract(a), Coordinate::new(1.0, -1.0));
        assert_eq!(a.scale(2.0), Coordinate::new(6.0, 8.0));
        assert_eq!(a.scale_xy(2.0, 0.5), Coordinate::new(6.0, 2.0));
        assert_eq!(a.with_x(0.0).with_y(1.0), Coordinate::new(0.0, 1.0));
        assert!(approx(a.magnitude(), 5.0));
        assert!(approx(Coordinate::ORIGIN.distance_to(a), 5.0));
    }

    #[test]
    fn angle_to_uses_screen_axes() {
        let o = Coordinate::ORIGIN;
        assert!(approx(o.angle_to(Coordinate::new(1.0, 0.0)), 0.0));
        // Up on screen is negative y.
        assert!(approx(o.angle_to(Coordinate::new(0.0, -1.0)), PI / 2.0));
        assert!(approx(o.angle_to(Coordinate::new(-1.0, 0.0)), PI));
        assert!(approx(o.angle_to(Coordinate::new(0.0, 1.0)), 1.5 * PI));
    }

    #[test]
    fn bounds_accept_corners_in_any_order() {
        let lo = Coordinate::new(0.0, 0.0);
        let hi = Coordinate::new(10.0, 10.0);
        let p = Coordinate::new(10.0, 0.0);
        assert!(p.is_within(lo, hi));
        assert!(p.is_within(hi, lo));
        assert!(!Coordinate::new(10.5, 0.0).is_within(lo, hi));
        assert_eq!(
            Coordinate::new(-3.0, 12.0).move_within(hi, lo),
            Coordinate::new(0.0, 10.0)
        );
    }

    #[test]
    fn interpolate_is_component_wise() {
        let a = Coordinate::new(0.0, 10.0);
        let b = Coordinate::new(10.0, 20.0);
        assert_eq!(Coordinate::interpolate(a, b, 0.25), Coordinate::new(2.5, 12.5));
        assert_eq!(Coordinate::interpolate(a, b, 0.0), a);
    }

    #[test]
    fn serializes_as_pair() {
        let json = serde_json::to_string(&Coordinate::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Coordinate = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(back, Coordinate::new(3.0, 4.0));
    }
}
