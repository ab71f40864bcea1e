//! Rotation values normalized into the half-open range `[-2π, 2π)`.

use std::f64::consts::TAU;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stored in radians. Serialized as a bare radian number.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Angle {
    radians: f64,
}

/// Map `radians` into `[-2π, 2π)`. In-range values come back bit-identical;
/// non-finite input passes through.
pub fn normalize_radians(radians: f64) -> f64 {
    if !radians.is_finite() || (-TAU..TAU).contains(&radians) {
        return radians;
    }
    // rem_euclid may round up to exactly 2 TAU.
    let wrapped = (radians + TAU).rem_euclid(2.0 * TAU) - TAU;
    if wrapped >= TAU {
        -TAU
    } else {
        wrapped
    }
}

/// Signed shortest turn from `origin` to `target`, in `(-π, π]`.
#[inline]
pub fn shortest_diff(target: f64, origin: f64) -> f64 {
    let d = target - origin;
    d.sin().atan2(d.cos())
}

impl Angle {
    pub const ZERO: Angle = Angle { radians: 0.0 };

    pub fn from_radians(radians: f64) -> Self {
        Self {
            radians: normalize_radians(radians),
        }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.radians
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.radians.to_degrees()
    }

    pub fn is_finite(self) -> bool {
        self.radians.is_finite()
    }

    pub fn rotate(self, delta: f64) -> Self {
        Self::from_radians(self.radians + delta)
    }

    /// Interpolate along the shorter arc. `t` outside `[0, 1]` extrapolates.
    pub fn lerp(self, other: Angle, t: f64) -> Self {
        Self::from_radians(self.radians + shortest_diff(other.radians, self.radians) * t)
    }
}

impl From<f64> for Angle {
    fn from(radians: f64) -> Self {
        Angle::from_radians(radians)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> Self {
        angle.radians
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.radians)
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
    fn normalizes_into_half_open_range() {
        assert_eq!(Angle::from_radians(TAU).radians(), -TAU);
        assert!(approx(Angle::from_radians(3.0 * TAU + 0.5).radians(), -TAU + 0.5));
        assert!(approx(Angle::from_radians(-2.5 * TAU).radians(), -0.5 * TAU));
        assert!(approx(Angle::from_radians(-TAU - 0.25).radians(), TAU - 0.25));
    }

    #[test]
    fn in_range_values_are_untouched() {
        for r in [0.0, 0.1, -1.0, 6.0, -6.28] {
            assert_eq!(Angle::from_radians(r).radians(), r);
        }
    }

    #[test]
    fn rotate_matches_normalized_sum() {
        let a = Angle::from_radians(5.0).rotate(4.0);
        assert!(approx(a.radians(), normalize_radians(9.0)));
    }

    #[test]
    fn lerp_takes_short_arc() {
        let a = Angle::from_radians(0.1);
        let b = Angle::from_radians(TAU - 0.1);
        let mid = a.lerp(b, 0.5);
        assert!(approx(mid.radians(), 0.0));
        let quarter = Angle::ZERO.lerp(Angle::from_radians(PI / 2.0), 0.5);
        assert!(approx(quarter.radians(), PI / 4.0));
    }

    #[test]
    fn degrees_round_trip() {
        let a = Angle::from_degrees(90.0);
        assert!(approx(a.radians(), PI / 2.0));
        assert!(approx(a.degrees(), 90.0));
    }

    #[test]
    fn nan_passes_through() {
        assert!(Angle::from_radians(f64::NAN).radians().is_nan());
    }
}
