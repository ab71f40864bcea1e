//! Closed polygon stored as a circular doubly-linked list inside a slot arena.
//!
//! Every live point has a `prev` and a `next`; a lone point links to itself. `first`
//! marks where traversal starts, which is also the order the encoder writes points in.

use log::trace;

use crate::config::Bounds;
use crate::coordinate::Coordinate;
use crate::error::AnimationError;
use crate::ids::{PointId, PolygonId};

#[derive(Clone, Debug)]
struct Slot {
    coord: Coordinate,
    prev: PointId,
    next: PointId,
}

#[derive(Clone, Debug)]
pub struct PolygonModel {
    id: PolygonId,
    bounds: Bounds,
    slots: Vec<Option<Slot>>,
    first: Option<PointId>,
    len: usize,
}

impl PolygonModel {
    pub fn new(id: PolygonId, bounds: Bounds) -> Self {
        Self {
            id,
            bounds,
            slots: Vec::new(),
            first: None,
            len: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> PolygonId {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<PointId> {
        self.first
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn contains(&self, point: PointId) -> bool {
        self.slot(point).is_some()
    }

    pub fn point(&self, point: PointId) -> Option<Coordinate> {
        self.slot(point).map(|s| s.coord)
    }

    pub fn next_of(&self, point: PointId) -> Option<PointId> {
        self.slot(point).map(|s| s.next)
    }

    pub fn prev_of(&self, point: PointId) -> Option<PointId> {
        self.slot(point).map(|s| s.prev)
    }

    /// One lap around the loop starting at `first`.
    pub fn points(&self) -> Points<'_> {
        Points {
            polygon: self,
            cursor: self.first,
            left: self.len,
        }
    }

    pub fn coords(&self) -> Vec<Coordinate> {
        self.points().map(|(_, c)| c).collect()
    }

    /// Arithmetic mean of the points, `None` for an empty polygon.
    pub fn centroid(&self) -> Option<Coordinate> {
        if self.is_empty() {
            return None;
        }
        let sum = self
            .points()
            .fold(Coordinate::ORIGIN, |acc, (_, c)| acc.translate(c));
        Some(sum.scale(1.0 / self.len as f64))
    }

    /// Append after the current last point, keeping `first` unchanged.
    pub fn push_point(&mut self, coord: Coordinate) -> PointId {
        let coord = self.bounds.clamp(coord);
        match self.first {
            None => self.insert_lone(coord),
            Some(first) => {
                let last = self.slot(first).map_or(first, |s| s.prev);
                self.insert_after(last, coord)
            }
        }
    }

    /// Splice a point in near the segment closest to it.
    ///
    /// The closest existing point (first in traversal order on ties) is found, then the
    /// nearer of its two neighbours decides the side. If the new point is farther from
    /// the closest point than that segment is long, it is placed beyond the neighbour;
    /// if it is farther from the neighbour than the segment, it goes on the closest
    /// point's outer side; otherwise it goes between the two.
    pub fn add_point(&mut self, coord: Coordinate) -> PointId {
        let coord = self.bounds.clamp(coord);
        let Some((min_pt, min_dist)) = self.closest(coord) else {
            return self.insert_lone(coord);
        };
        if self.len == 1 {
            return self.insert_after(min_pt, coord);
        }

        let min_coord = self.coord_of(min_pt);
        let left = self.prev_of(min_pt).unwrap_or(min_pt);
        let right = self.next_of(min_pt).unwrap_or(min_pt);
        let left_dist = self.coord_of(left).distance_to(coord);
        let right_dist = self.coord_of(right).distance_to(coord);

        let id = if left_dist < right_dist {
            let between = min_coord.distance_to(self.coord_of(left));
            if min_dist > between {
                self.insert_before(left, coord)
            } else if left_dist > between {
                self.insert_after(min_pt, coord)
            } else {
                self.insert_after(left, coord)
            }
        } else {
            let between = min_coord.distance_to(self.coord_of(right));
            if min_dist > between {
                self.insert_after(right, coord)
            } else if right_dist > between {
                self.insert_before(min_pt, coord)
            } else {
                self.insert_after(min_pt, coord)
            }
        };
        trace!("polygon {}: added {id} at {:?}", self.id, coord.to_array());
        id
    }

    /// Unlink a point and join its neighbours to each other.
    pub fn remove_point(&mut self, point: PointId) -> Result<Coordinate, AnimationError> {
        let slot = self
            .slots
            .get_mut(point.0 as usize)
            .and_then(Option::take)
            .ok_or(AnimationError::UnknownPoint {
                polygon: self.id,
                point,
            })?;
        self.len -= 1;

        if self.len == 0 {
            self.first = None;
            return Ok(slot.coord);
        }
        if let Some(p) = self.slot_mut(slot.prev) {
            p.next = slot.next;
        }
        if let Some(n) = self.slot_mut(slot.next) {
            n.prev = slot.prev;
        }
        if self.first == Some(point) {
            self.first = Some(slot.next);
        }
        Ok(slot.coord)
    }

    /// Move a point, clamping into the polygon's bounds. Returns the stored value.
    pub fn set_point_coord(
        &mut self,
        point: PointId,
        coord: Coordinate,
    ) -> Result<Coordinate, AnimationError> {
        let coord = self.bounds.clamp(coord);
        let id = self.id;
        let slot = self
            .slot_mut(point)
            .ok_or(AnimationError::UnknownPoint { polygon: id, point })?;
        slot.coord = coord;
        Ok(coord)
    }

    fn closest(&self, coord: Coordinate) -> Option<(PointId, f64)> {
        let mut best: Option<(PointId, f64)> = None;
        for (id, c) in self.points() {
            let d = c.distance_to(coord);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best
    }

    fn slot(&self, point: PointId) -> Option<&Slot> {
        self.slots.get(point.0 as usize).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, point: PointId) -> Option<&mut Slot> {
        self.slots.get_mut(point.0 as usize).and_then(Option::as_mut)
    }

    fn coord_of(&self, point: PointId) -> Coordinate {
        self.point(point).unwrap_or(Coordinate::ORIGIN)
    }

    fn alloc(&mut self, slot: Slot) -> PointId {
        let id = PointId(self.slots.len() as u32);
        self.slots.push(Some(slot));
        self.len += 1;
        id
    }

    fn insert_lone(&mut self, coord: Coordinate) -> PointId {
        let id = PointId(self.slots.len() as u32);
        self.alloc(Slot {
            coord,
            prev: id,
            next: id,
        });
        self.first = Some(id);
        id
    }

    fn insert_after(&mut self, anchor: PointId, coord: Coordinate) -> PointId {
        let next = self.next_of(anchor).unwrap_or(anchor);
        let id = self.alloc(Slot {
            coord,
            prev: anchor,
            next,
        });
        if let Some(a) = self.slot_mut(anchor) {
            a.next = id;
        }
        if let Some(n) = self.slot_mut(next) {
            n.prev = id;
        }
        id
    }

    /// Inserting before `first` makes the new point the traversal start.
    fn insert_before(&mut self, anchor: PointId, coord: Coordinate) -> PointId {
        let prev = self.prev_of(anchor).unwrap_or(anchor);
        let id = self.insert_after(prev, coord);
        if self.first == Some(anchor) {
            self.first = Some(id);
        }
        id
    }
}

pub struct Points<'a> {
    polygon: &'a PolygonModel,
    cursor: Option<PointId>,
    left: usize,
}

impl Iterator for Points<'_> {
    type Item = (PointId, Coordinate);

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        let id = self.cursor?;
        let slot = self.polygon.slot(id)?;
        self.left -= 1;
        self.cursor = Some(slot.next);
        Some((id, slot.coord))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.left, Some(self.left))
    }
}
