//! JSON scene documents: polygons with their keyframes, independent of any live model.
//!
//! ```json
//! { "polygons": [ {
//!     "points": [[108, 108], [148, 108], [148, 148], [108, 148]],
//!     "position_keyframes": [ { "frame": 0, "position": [-20, 0] } ],
//!     "rotation_keyframes": [ { "frame": 63, "radians": 3.14159 } ]
//! } ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::config::{Config, KEYFRAMES};
use crate::coordinate::Coordinate;
use crate::error::AnimationError;
use crate::events::EditorBus;
use crate::frame_model::FrameModel;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub polygons: Vec<ScenePolygon>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenePolygon {
    pub points: Vec<Coordinate>,
    #[serde(default)]
    pub position_keyframes: Vec<ScenePosition>,
    #[serde(default)]
    pub rotation_keyframes: Vec<SceneRotation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePosition {
    pub frame: usize,
    pub position: Coordinate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneRotation {
    pub frame: usize,
    pub radians: f64,
}

impl SceneDescription {
    pub fn from_json_str(text: &str) -> Result<Self, AnimationError> {
        let scene: SceneDescription =
            serde_json::from_str(text).map_err(|e| AnimationError::Scene(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn to_json_string(&self) -> Result<String, AnimationError> {
        serde_json::to_string_pretty(self).map_err(|e| AnimationError::Scene(e.to_string()))
    }

    fn validate(&self) -> Result<(), AnimationError> {
        for (i, polygon) in self.polygons.iter().enumerate() {
            let frames = polygon
                .position_keyframes
                .iter()
                .map(|k| k.frame)
                .chain(polygon.rotation_keyframes.iter().map(|k| k.frame));
            for frame in frames {
                if frame >= KEYFRAMES {
                    return Err(AnimationError::Scene(format!(
                        "polygon {i}: keyframe at frame {frame} is outside 0..{KEYFRAMES}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build a fresh model. Points are appended in document order; the cursor is left at
    /// frame 0.
    pub fn build(&self, config: Config, bus: EditorBus) -> Result<FrameModel, AnimationError> {
        self.validate()?;
        let mut model = FrameModel::new(config, bus);
        for polygon in &self.polygons {
            let id = model.add_polygon_with(&polygon.points);
            for k in &polygon.position_keyframes {
                model.add_position_keyframe(k.frame, id, Some(k.position))?;
            }
            for k in &polygon.rotation_keyframes {
                model.add_rotation_keyframe(k.frame, id, Some(Angle::from_radians(k.radians)))?;
            }
        }
        model.set_current_frame(0);
        Ok(model)
    }
}
