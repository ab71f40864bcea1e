//! Event vocabulary shared by the model, the preview loop and input surfaces.
//!
//! Names are namespaced strings; payloads travel as one [`EventPayload`] enum so a single
//! bus type serves every producer.

use spranim_events_core::EventBus;

use crate::coordinate::Coordinate;
use crate::ids::PolygonId;

pub type EditorBus = EventBus<EventPayload>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventPayload {
    None,
    Polygon(PolygonId),
    Frame(usize),
    Keyframe { frame: usize, polygon: PolygonId },
    Pointer(Coordinate),
    Key(char),
}

impl EventPayload {
    pub fn polygon(&self) -> Option<PolygonId> {
        match *self {
            EventPayload::Polygon(id) | EventPayload::Keyframe { polygon: id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn frame(&self) -> Option<usize> {
        match *self {
            EventPayload::Frame(f) | EventPayload::Keyframe { frame: f, .. } => Some(f),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<Coordinate> {
        match *self {
            EventPayload::Pointer(at) => Some(at),
            _ => None,
        }
    }
}

pub mod frame_model {
    pub const ADD_POLYGON: &str = "framemodel-add-polygon";
    pub const REMOVE_POLYGON: &str = "framemodel-remove-polygon";
    pub const CHANGE_FRAME: &str = "framemodel-change-frame";
    pub const ADD_POSITION_KEYFRAME: &str = "framemodel-add-position-keyframe";
    pub const REMOVE_POSITION_KEYFRAME: &str = "framemodel-remove-position-keyframe";
    pub const ADD_ROTATION_KEYFRAME: &str = "framemodel-add-rotation-keyframe";
    pub const REMOVE_ROTATION_KEYFRAME: &str = "framemodel-remove-rotation-keyframe";
}

/// Pointer and keyboard notifications a host surface forwards onto the bus.
pub mod input {
    pub const DRAG_START: &str = "input-drag-start";
    pub const DRAG: &str = "input-drag";
    pub const DRAG_END: &str = "input-drag-end";
    pub const CLICK: &str = "input-click";
    pub const CLICK_NO_DRAG: &str = "input-click-no-drag";
    pub const HOVER: &str = "input-hover";
    pub const KEY: &str = "input-key";
}

pub mod draw_timer {
    pub const START: &str = "drawtimer-start";
    pub const STOP: &str = "drawtimer-stop";
    pub const DRAW: &str = "drawtimer-draw";
    pub const STEP: &str = "drawtimer-step";
}

pub mod previewer {
    pub const STOP: &str = "previewer-stop";
}
