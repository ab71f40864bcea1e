//! Per-frame keyframe storage.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::coordinate::Coordinate;
use crate::ids::PolygonId;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionKeyFrame {
    pub frame: usize,
    pub position: Coordinate,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotationKeyFrame {
    pub frame: usize,
    pub rotation: Angle,
}

/// Keyframes pinned at one timeline index, at most one of each kind per polygon.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    index: usize,
    positions: HashMap<PolygonId, PositionKeyFrame>,
    rotations: HashMap<PolygonId, RotationKeyFrame>,
}

impl Frame {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position_keyframe(&self, polygon: PolygonId) -> Option<&PositionKeyFrame> {
        self.positions.get(&polygon)
    }

    pub fn rotation_keyframe(&self, polygon: PolygonId) -> Option<&RotationKeyFrame> {
        self.rotations.get(&polygon)
    }

    pub fn has_keyframe(&self, polygon: PolygonId) -> bool {
        self.positions.contains_key(&polygon) || self.rotations.contains_key(&polygon)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.rotations.is_empty()
    }

    pub(crate) fn set_position(&mut self, polygon: PolygonId, position: Coordinate) {
        self.positions.insert(
            polygon,
            PositionKeyFrame {
                frame: self.index,
                position,
            },
        );
    }

    pub(crate) fn set_rotation(&mut self, polygon: PolygonId, rotation: Angle) {
        self.rotations.insert(
            polygon,
            RotationKeyFrame {
                frame: self.index,
                rotation,
            },
        );
    }

    pub(crate) fn take_position(&mut self, polygon: PolygonId) -> Option<PositionKeyFrame> {
        self.positions.remove(&polygon)
    }

    pub(crate) fn take_rotation(&mut self, polygon: PolygonId) -> Option<RotationKeyFrame> {
        self.rotations.remove(&polygon)
    }
}
