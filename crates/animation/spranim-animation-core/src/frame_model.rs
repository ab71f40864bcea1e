//! Timeline of 64 frames plus the polygons they animate.
//!
//! Mutations dispatch events synchronously on the model's bus while `&mut self` is held.
//! Handlers therefore must not try to reach back into the same `FrameModel`; they get
//! everything they need from the payload.

use indexmap::IndexMap;
use log::debug;

use crate::angle::Angle;
use crate::config::{Config, KEYFRAMES};
use crate::coordinate::Coordinate;
use crate::error::AnimationError;
use crate::events::{frame_model as ev, EditorBus, EventPayload};
use crate::frame::{Frame, PositionKeyFrame, RotationKeyFrame};
use crate::ids::{IdAllocator, PolygonId};
use crate::interp::{blend_factor, bracket};
use crate::polygon::PolygonModel;
use crate::scene::{SceneDescription, ScenePolygon, ScenePosition, SceneRotation};

/// Position of a polygon with no position keyframes.
pub const START_POSITION: Coordinate = Coordinate::ORIGIN;
/// Rotation of a polygon with no rotation keyframes.
pub const START_ROTATION: Angle = Angle::ZERO;

pub struct FrameModel {
    config: Config,
    bus: EditorBus,
    ids: IdAllocator,
    polygons: IndexMap<PolygonId, PolygonModel>,
    frames: Vec<Frame>,
    current_frame: usize,
}

impl FrameModel {
    pub fn new(config: Config, bus: EditorBus) -> Self {
        Self {
            config,
            bus,
            ids: IdAllocator::new(),
            polygons: IndexMap::new(),
            frames: (0..KEYFRAMES).map(Frame::new).collect(),
            current_frame: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bus(&self) -> &EditorBus {
        &self.bus
    }

    // ---- timeline ----

    #[inline]
    pub fn current_frame_index(&self) -> usize {
        self.current_frame
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.current_frame]
    }

    /// Move the cursor, clamped to the last frame. Always dispatches `CHANGE_FRAME`.
    pub fn set_current_frame(&mut self, frame: usize) {
        self.current_frame = frame.min(KEYFRAMES - 1);
        self.bus
            .dispatch(ev::CHANGE_FRAME, &EventPayload::Frame(self.current_frame));
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    // ---- polygons ----

    /// Polygons in insertion order.
    pub fn polygons(&self) -> impl Iterator<Item = &PolygonModel> + '_ {
        self.polygons.values()
    }

    pub fn polygon_ids(&self) -> Vec<PolygonId> {
        self.polygons.keys().copied().collect()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&PolygonModel> {
        self.polygons.get(&id)
    }

    /// Direct point editing. No events are dispatched for point edits.
    pub fn polygon_mut(&mut self, id: PolygonId) -> Option<&mut PolygonModel> {
        self.polygons.get_mut(&id)
    }

    /// Add a polygon seeded with `config.default_polygon`.
    pub fn add_polygon(&mut self) -> PolygonId {
        let seed = self.config.default_polygon.clone();
        self.add_polygon_with(&seed)
    }

    /// Add a polygon whose points are appended in the given order.
    pub fn add_polygon_with(&mut self, points: &[Coordinate]) -> PolygonId {
        let id = self.ids.alloc_polygon();
        let mut polygon = PolygonModel::new(id, self.config.point_bounds);
        for &p in points {
            polygon.push_point(p);
        }
        self.polygons.insert(id, polygon);
        debug!("added polygon {id} with {} point(s)", points.len());
        self.bus.dispatch(ev::ADD_POLYGON, &EventPayload::Polygon(id));
        id
    }

    /// Remove a polygon and every keyframe that references it. Keyframe removal events
    /// fire first, then `REMOVE_POLYGON`.
    pub fn remove_polygon(&mut self, id: PolygonId) -> Result<PolygonModel, AnimationError> {
        if !self.polygons.contains_key(&id) {
            return Err(AnimationError::UnknownPolygon(id));
        }
        for frame in 0..KEYFRAMES {
            self.remove_position_keyframe(frame, id);
            self.remove_rotation_keyframe(frame, id);
        }
        let polygon = self
            .polygons
            .shift_remove(&id)
            .ok_or(AnimationError::UnknownPolygon(id))?;
        debug!("removed polygon {id}");
        self.bus.dispatch(ev::REMOVE_POLYGON, &EventPayload::Polygon(id));
        Ok(polygon)
    }

    /// Mean of the polygon's points translated by its position at the current frame.
    pub fn polygon_center(&self, id: PolygonId) -> Option<Coordinate> {
        let centroid = self.polygons.get(&id)?.centroid()?;
        Some(centroid.translate(self.polygon_position(id)))
    }

    // ---- interpolation ----

    pub fn polygon_position(&self, id: PolygonId) -> Coordinate {
        self.polygon_position_at(id, self.current_frame)
    }

    pub fn polygon_rotation(&self, id: PolygonId) -> Angle {
        self.polygon_rotation_at(id, self.current_frame)
    }

    /// Position of `id` at `frame`: exact at keyframes, held flat outside the first and
    /// last keyframe, linear in between.
    pub fn polygon_position_at(&self, id: PolygonId, frame: usize) -> Coordinate {
        let track = self
            .frames
            .iter()
            .filter_map(|f| f.position_keyframe(id).map(|k| (k.frame, k.position)));
        match bracket(track, frame) {
            (None, None) => START_POSITION,
            (Some((_, v)), None) | (None, Some((_, v))) => v,
            (Some((l, a)), Some((r, _))) if l == r => a,
            (Some((l, a)), Some((r, b))) => Coordinate::interpolate(a, b, blend_factor(l, r, frame)),
        }
    }

    /// Rotation analogue of [`Self::polygon_position_at`], blending along the shorter arc.
    pub fn polygon_rotation_at(&self, id: PolygonId, frame: usize) -> Angle {
        let track = self
            .frames
            .iter()
            .filter_map(|f| f.rotation_keyframe(id).map(|k| (k.frame, k.rotation)));
        match bracket(track, frame) {
            (None, None) => START_ROTATION,
            (Some((_, v)), None) | (None, Some((_, v))) => v,
            (Some((l, a)), Some((r, _))) if l == r => a,
            (Some((l, a)), Some((r, b))) => a.lerp(b, blend_factor(l, r, frame)),
        }
    }

    // ---- keyframes ----

    pub fn position_keyframe(&self, frame: usize, id: PolygonId) -> Option<&PositionKeyFrame> {
        self.frames.get(frame)?.position_keyframe(id)
    }

    pub fn rotation_keyframe(&self, frame: usize, id: PolygonId) -> Option<&RotationKeyFrame> {
        self.frames.get(frame)?.rotation_keyframe(id)
    }

    /// Position keyframes of one polygon in ascending frame order.
    pub fn position_keyframes_for(&self, id: PolygonId) -> Vec<PositionKeyFrame> {
        self.frames
            .iter()
            .filter_map(|f| f.position_keyframe(id).copied())
            .collect()
    }

    pub fn rotation_keyframes_for(&self, id: PolygonId) -> Vec<RotationKeyFrame> {
        self.frames
            .iter()
            .filter_map(|f| f.rotation_keyframe(id).copied())
            .collect()
    }

    /// Pin a position at `frame`. Without an explicit value, the interpolated position at
    /// that frame is pinned. The value is clamped to `position_bounds` and the cursor
    /// jumps to `frame`.
    pub fn add_position_keyframe(
        &mut self,
        frame: usize,
        id: PolygonId,
        position: Option<Coordinate>,
    ) -> Result<Coordinate, AnimationError> {
        self.check_target(frame, id)?;
        let value = position.unwrap_or_else(|| self.polygon_position_at(id, frame));
        if !value.is_finite() {
            return Err(AnimationError::NonFinite { field: "position" });
        }
        let value = self.config.position_bounds.clamp(value);
        self.frames[frame].set_position(id, value);
        self.bus.dispatch(
            ev::ADD_POSITION_KEYFRAME,
            &EventPayload::Keyframe { frame, polygon: id },
        );
        self.set_current_frame(frame);
        Ok(value)
    }

    /// Rotation analogue of [`Self::add_position_keyframe`].
    pub fn add_rotation_keyframe(
        &mut self,
        frame: usize,
        id: PolygonId,
        rotation: Option<Angle>,
    ) -> Result<Angle, AnimationError> {
        self.check_target(frame, id)?;
        let value = rotation.unwrap_or_else(|| self.polygon_rotation_at(id, frame));
        if !value.is_finite() {
            return Err(AnimationError::NonFinite { field: "rotation" });
        }
        // Re-normalize; a deserialized Angle may not have gone through from_radians.
        let value = Angle::from_radians(value.radians());
        self.frames[frame].set_rotation(id, value);
        self.bus.dispatch(
            ev::ADD_ROTATION_KEYFRAME,
            &EventPayload::Keyframe { frame, polygon: id },
        );
        self.set_current_frame(frame);
        Ok(value)
    }

    /// Pin both channels at their interpolated values, leaving existing keyframes alone.
    pub fn add_keyframe(&mut self, frame: usize, id: PolygonId) -> Result<(), AnimationError> {
        self.check_target(frame, id)?;
        if self.position_keyframe(frame, id).is_none() {
            self.add_position_keyframe(frame, id, None)?;
        }
        if self.rotation_keyframe(frame, id).is_none() {
            self.add_rotation_keyframe(frame, id, None)?;
        }
        Ok(())
    }

    /// Dispatches `REMOVE_POSITION_KEYFRAME` only when a keyframe was actually removed.
    pub fn remove_position_keyframe(
        &mut self,
        frame: usize,
        id: PolygonId,
    ) -> Option<PositionKeyFrame> {
        let removed = self.frames.get_mut(frame)?.take_position(id)?;
        self.bus.dispatch(
            ev::REMOVE_POSITION_KEYFRAME,
            &EventPayload::Keyframe { frame, polygon: id },
        );
        Some(removed)
    }

    pub fn remove_rotation_keyframe(
        &mut self,
        frame: usize,
        id: PolygonId,
    ) -> Option<RotationKeyFrame> {
        let removed = self.frames.get_mut(frame)?.take_rotation(id)?;
        self.bus.dispatch(
            ev::REMOVE_ROTATION_KEYFRAME,
            &EventPayload::Keyframe { frame, polygon: id },
        );
        Some(removed)
    }

    /// Remove both channels at `frame`. Returns true if anything was removed.
    pub fn remove_keyframe(&mut self, frame: usize, id: PolygonId) -> bool {
        let pos = self.remove_position_keyframe(frame, id).is_some();
        let rot = self.remove_rotation_keyframe(frame, id).is_some();
        pos || rot
    }

    fn check_target(&self, frame: usize, id: PolygonId) -> Result<(), AnimationError> {
        if frame >= KEYFRAMES {
            return Err(AnimationError::FrameOutOfRange { frame });
        }
        if !self.polygons.contains_key(&id) {
            return Err(AnimationError::UnknownPolygon(id));
        }
        Ok(())
    }

    // ---- scenes ----

    /// Snapshot of polygons and keyframes, suitable for JSON.
    pub fn to_scene(&self) -> SceneDescription {
        let polygons = self
            .polygons
            .values()
            .map(|p| ScenePolygon {
                points: p.coords(),
                position_keyframes: self
                    .position_keyframes_for(p.id())
                    .into_iter()
                    .map(|k| ScenePosition {
                        frame: k.frame,
                        position: k.position,
                    })
                    .collect(),
                rotation_keyframes: self
                    .rotation_keyframes_for(p.id())
                    .into_iter()
                    .map(|k| SceneRotation {
                        frame: k.frame,
                        radians: k.rotation.radians(),
                    })
                    .collect(),
            })
            .collect();
        SceneDescription { polygons }
    }
}
