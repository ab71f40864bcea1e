//! Field layout of the packed animation stream.
//!
//! ```text
//! per polygon:
//!   NUM_POINTS:4  { X:8 Y:8 }*
//!   NUM_POS_KF:6  { FRAME:6 X:8 Y:8 }*
//!   NUM_ROT_KF:6  { FRAME:6 ANGLE512:9 }*
//! ```
//!
//! Records here hold the exact unsigned integers that go on the wire.

use std::f64::consts::TAU;
use std::fmt;

use spranim_codec_core::{BitBuffer, BitBufferError};

use crate::error::AnimationError;

pub const NUM_POINTS_BITS: u32 = 4;
pub const POINT_BITS: u32 = 8;
pub const NUM_KEYFRAMES_BITS: u32 = 6;
pub const FRAME_INDEX_BITS: u32 = 6;
pub const POSITION_BITS: u32 = 8;
pub const ANGLE_BITS: u32 = 9;

/// Steps in the full `[-2π, 2π)` rotation range.
pub const ANGLE_STEPS: u32 = 1 << ANGLE_BITS;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawPolygon {
    pub points: Vec<(u32, u32)>,
    pub positions: Vec<RawPosition>,
    pub rotations: Vec<RawRotation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawPosition {
    pub frame: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRotation {
    pub frame: u32,
    pub angle512: u32,
}

impl fmt::Display for RawPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} point(s) {:?}, position {:?}, rotation {:?}",
            self.points.len(),
            self.points,
            self.positions
                .iter()
                .map(|k| (k.frame, k.x, k.y))
                .collect::<Vec<_>>(),
            self.rotations
                .iter()
                .map(|k| (k.frame, k.angle512))
                .collect::<Vec<_>>()
        )
    }
}

/// Quantize radians in `[-2π, 2π)` onto `0..512`. The top of the range is clamped so a
/// value that rounds up to 2π still fits.
pub fn angle_to_512(radians: f64) -> Result<u32, AnimationError> {
    if !radians.is_finite() {
        return Err(AnimationError::NonFinite { field: "rotation" });
    }
    let steps = ((radians + TAU) * f64::from(ANGLE_STEPS) / (2.0 * TAU)).floor();
    Ok(steps.clamp(0.0, f64::from(ANGLE_STEPS - 1)) as u32)
}

/// Width of one quantization step in radians.
pub fn angle_step() -> f64 {
    2.0 * TAU / f64::from(ANGLE_STEPS)
}

pub fn angle_from_512(value: u32) -> f64 {
    f64::from(value) / f64::from(ANGLE_STEPS) * 2.0 * TAU - TAU
}

/// Round `value` and check it fits an unsigned field of `bits`.
pub fn to_field(field: &'static str, value: f64, bits: u32) -> Result<u32, AnimationError> {
    if !value.is_finite() {
        return Err(AnimationError::NonFinite { field });
    }
    let rounded = value.round();
    let limit = f64::from(1u32 << bits);
    if !(0.0..limit).contains(&rounded) {
        return Err(AnimationError::FieldOverflow {
            field,
            value: rounded as i64,
            bits,
        });
    }
    Ok(rounded as u32)
}

fn count_field(field: &'static str, count: usize, bits: u32) -> Result<u32, AnimationError> {
    match u32::try_from(count) {
        Ok(n) if n < (1u32 << bits) => Ok(n),
        _ => Err(AnimationError::FieldOverflow {
            field,
            value: count as i64,
            bits,
        }),
    }
}

pub fn write_polygon(buf: &mut BitBuffer, polygon: &RawPolygon) -> Result<(), AnimationError> {
    buf.write_bits(
        NUM_POINTS_BITS,
        count_field("point count", polygon.points.len(), NUM_POINTS_BITS)?,
    )?;
    for &(x, y) in &polygon.points {
        buf.write_bits(POINT_BITS, x)?;
        buf.write_bits(POINT_BITS, y)?;
    }

    buf.write_bits(
        NUM_KEYFRAMES_BITS,
        count_field(
            "position keyframe count",
            polygon.positions.len(),
            NUM_KEYFRAMES_BITS,
        )?,
    )?;
    for k in &polygon.positions {
        buf.write_bits(FRAME_INDEX_BITS, k.frame)?;
        buf.write_bits(POSITION_BITS, k.x)?;
        buf.write_bits(POSITION_BITS, k.y)?;
    }

    buf.write_bits(
        NUM_KEYFRAMES_BITS,
        count_field(
            "rotation keyframe count",
            polygon.rotations.len(),
            NUM_KEYFRAMES_BITS,
        )?,
    )?;
    for k in &polygon.rotations {
        buf.write_bits(FRAME_INDEX_BITS, k.frame)?;
        buf.write_bits(ANGLE_BITS, k.angle512)?;
    }
    Ok(())
}

/// Read the polygon that follows a point count already taken from the stream.
pub fn read_polygon_body(buf: &mut BitBuffer, num_points: u32) -> Result<RawPolygon, BitBufferError> {
    let mut polygon = RawPolygon::default();
    for _ in 0..num_points {
        let x = buf.read_bits(POINT_BITS)?;
        let y = buf.read_bits(POINT_BITS)?;
        polygon.points.push((x, y));
    }
    let positions = buf.read_bits(NUM_KEYFRAMES_BITS)?;
    for _ in 0..positions {
        polygon.positions.push(RawPosition {
            frame: buf.read_bits(FRAME_INDEX_BITS)?,
            x: buf.read_bits(POSITION_BITS)?,
            y: buf.read_bits(POSITION_BITS)?,
        });
    }
    let rotations = buf.read_bits(NUM_KEYFRAMES_BITS)?;
    for _ in 0..rotations {
        polygon.rotations.push(RawRotation {
            frame: buf.read_bits(FRAME_INDEX_BITS)?,
            angle512: buf.read_bits(ANGLE_BITS)?,
        });
    }
    Ok(polygon)
}

pub fn read_polygon(buf: &mut BitBuffer) -> Result<RawPolygon, BitBufferError> {
    let num_points = buf.read_bits(NUM_POINTS_BITS)?;
    read_polygon_body(buf, num_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_quantization_edges() {
        assert_eq!(angle_to_512(0.0).unwrap(), 256);
        assert_eq!(angle_to_512(-TAU).unwrap(), 0);
        assert_eq!(angle_to_512(TAU - 1e-12).unwrap(), 511);
        assert_eq!(angle_to_512(TAU).unwrap(), 511);
        assert_eq!(angle_from_512(256), 0.0);
        assert_eq!(angle_from_512(0), -TAU);
    }

    #[test]
    fn fields_are_range_checked() {
        assert_eq!(to_field("x", 254.6, 8).unwrap(), 255);
        assert_eq!(
            to_field("x", 255.5, 8),
            Err(AnimationError::FieldOverflow {
                field: "x",
                value: 256,
                bits: 8
            })
        );
        assert!(to_field("x", -0.6, 8).is_err());
        assert_eq!(to_field("x", -0.4, 8).unwrap(), 0);
    }

    #[test]
    fn non_finite_values_never_reach_the_wire() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                angle_to_512(bad),
                Err(AnimationError::NonFinite { field: "rotation" })
            );
            assert_eq!(
                to_field("position x", bad, 8),
                Err(AnimationError::NonFinite { field: "position x" })
            );
        }
    }

    #[test]
    fn oversized_point_count_is_rejected() {
        let polygon = RawPolygon {
            points: vec![(0, 0); 16],
            ..RawPolygon::default()
        };
        let mut buf = BitBuffer::new();
        assert!(matches!(
            write_polygon(&mut buf, &polygon),
            Err(AnimationError::FieldOverflow { bits: 4, .. })
        ));
    }
}
