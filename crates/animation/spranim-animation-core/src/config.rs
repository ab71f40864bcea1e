//! Core configuration for spranim-animation-core.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::AnimationError;

/// Length of the timeline. The wire format spends 6 bits on a frame index.
pub const KEYFRAMES: usize = 64;

/// Default draw/preview rate.
pub const DEFAULT_FPS: u32 = 16;

/// Inclusive axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Bounds {
    pub const fn new(min: Coordinate, max: Coordinate) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.is_within(self.min, self.max)
    }

    #[inline]
    pub fn clamp(&self, coord: Coordinate) -> Coordinate {
        coord.move_within(self.min, self.max)
    }
}

/// Model bounds and defaults. Every field falls back to its default when missing
/// from a JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fps: u32,

    /// Polygon points are clamped into this box.
    pub point_bounds: Bounds,

    /// Position keyframes are clamped into this box. The encoder subtracts `min`
    /// to obtain unsigned fields.
    pub position_bounds: Bounds,

    /// Points seeded by `FrameModel::add_polygon`, in chain order.
    pub default_polygon: Vec<Coordinate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            point_bounds: Bounds::new(Coordinate::new(0.0, 0.0), Coordinate::new(255.0, 255.0)),
            position_bounds: Bounds::new(
                Coordinate::new(-128.0, -128.0),
                Coordinate::new(127.0, 127.0),
            ),
            default_polygon: vec![
                Coordinate::new(108.0, 108.0),
                Coordinate::new(148.0, 108.0),
                Coordinate::new(148.0, 148.0),
                Coordinate::new(108.0, 148.0),
            ],
        }
    }
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self, AnimationError> {
        let cfg: Config =
            serde_json::from_str(text).map_err(|e| AnimationError::Config(e.to_string()))?;
        cfg.validate().map_err(AnimationError::Config)?;
        Ok(cfg)
    }

    /// Basic invariants: non-zero fps, well-ordered bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("fps must be > 0".into());
        }
        for (name, b) in [
            ("point_bounds", &self.point_bounds),
            ("position_bounds", &self.position_bounds),
        ] {
            if b.min.x() > b.max.x() || b.min.y() > b.max.y() {
                return Err(format!("{name}.min must not exceed {name}.max"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "fps": 24 }"#).unwrap();
        assert_eq!(cfg.fps, 24);
        assert_eq!(cfg.default_polygon.len(), 4);
        assert_eq!(cfg.position_bounds.min, Coordinate::new(-128.0, -128.0));
    }

    #[test]
    fn bounds_are_written_as_pairs() {
        let cfg = Config::from_json_str(
            r#"{ "point_bounds": { "min": [0, 0], "max": [99, 99] } }"#,
        )
        .unwrap();
        assert!(cfg.point_bounds.contains(Coordinate::new(99.0, 0.0)));
        assert!(!cfg.point_bounds.contains(Coordinate::new(100.0, 0.0)));
    }

    #[test]
    fn rejects_inverted_bounds_and_zero_fps() {
        assert!(matches!(
            Config::from_json_str(r#"{ "fps": 0 }"#),
            Err(AnimationError::Config(_))
        ));
        assert!(Config::from_json_str(
            r#"{ "position_bounds": { "min": [5, 5], "max": [0, 0] } }"#
        )
        .is_err());
    }
}
