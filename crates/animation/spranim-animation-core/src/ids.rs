//! Identifiers and the polygon id allocator.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolygonId(pub u32);

/// Slot of a point inside its polygon. Only meaningful for the polygon that issued it;
/// ids are never reused by that polygon.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pt{}", self.0)
    }
}

/// Monotonic allocator, one per `FrameModel`. Removed ids are not handed out again.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_polygon: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_polygon(&mut self) -> PolygonId {
        let id = PolygonId(self.next_polygon);
        self.next_polygon = self.next_polygon.wrapping_add(1);
        id
    }
}
