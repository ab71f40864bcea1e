//! Packs a [`FrameModel`] into the bitstream described in [`crate::wire`].
//!
//! Encoding never mutates the model and never dispatches events. Every encode re-reads
//! the finished buffer and compares it with the records that were written; a mismatch
//! is returned as [`AnimationError::SelfCheck`] instead of a buffer.

use log::{debug, trace};
use spranim_codec_core::{bytes_to_binary_string, BitBuffer};

use crate::coordinate::Coordinate;
use crate::error::AnimationError;
use crate::frame_model::FrameModel;
use crate::polygon::PolygonModel;
use crate::wire::{
    angle_from_512, angle_step, angle_to_512, read_polygon, to_field, write_polygon,
    RawPolygon, RawPosition, RawRotation, FRAME_INDEX_BITS, POINT_BITS, POSITION_BITS,
};

/// Largest distance a rounded coordinate field may sit from its model value.
const ROUNDING_SLACK: f64 = 0.5 + 1e-9;

pub struct AnimationEncoder<'a> {
    model: &'a FrameModel,
}

impl<'a> AnimationEncoder<'a> {
    pub fn new(model: &'a FrameModel) -> Self {
        Self { model }
    }

    /// Wire records for every polygon, in polygon insertion order.
    pub fn snapshot(&self) -> Result<Vec<RawPolygon>, AnimationError> {
        self.model
            .polygons()
            .map(|polygon| self.snapshot_polygon(polygon))
            .collect()
    }

    fn snapshot_polygon(&self, polygon: &PolygonModel) -> Result<RawPolygon, AnimationError> {
        if polygon.is_empty() {
            return Err(AnimationError::EmptyPolygon(polygon.id()));
        }
        let offset = self.model.config().position_bounds.min;

        let points = polygon
            .points()
            .map(|(_, c)| -> Result<(u32, u32), AnimationError> {
                Ok((
                    to_field("point x", c.x(), POINT_BITS)?,
                    to_field("point y", c.y(), POINT_BITS)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let positions = self
            .model
            .position_keyframes_for(polygon.id())
            .into_iter()
            .map(|k| -> Result<RawPosition, AnimationError> {
                let shifted = k.position.subtract(offset);
                Ok(RawPosition {
                    frame: to_field("frame index", k.frame as f64, FRAME_INDEX_BITS)?,
                    x: to_field("position x", shifted.x(), POSITION_BITS)?,
                    y: to_field("position y", shifted.y(), POSITION_BITS)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rotations = self
            .model
            .rotation_keyframes_for(polygon.id())
            .into_iter()
            .map(|k| -> Result<RawRotation, AnimationError> {
                Ok(RawRotation {
                    frame: to_field("frame index", k.frame as f64, FRAME_INDEX_BITS)?,
                    angle512: angle_to_512(k.rotation.radians())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawPolygon {
            points,
            positions,
            rotations,
        })
    }

    /// Encode and verify. The returned buffer's read cursor is rewound.
    pub fn encode(&self) -> Result<BitBuffer, AnimationError> {
        let records = self.snapshot()?;
        let mut buf = BitBuffer::new();
        for record in &records {
            trace!("writing {record}");
            write_polygon(&mut buf, record)?;
        }

        buf.rewind();
        for (i, (expected, polygon)) in records.iter().zip(self.model.polygons()).enumerate() {
            let actual = read_polygon(&mut buf)?;
            if actual != *expected {
                return Err(AnimationError::SelfCheck {
                    polygon: i,
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
            self.check_against_model(i, polygon, &actual)?;
        }
        if buf.remaining() != 0 {
            return Err(AnimationError::SelfCheck {
                polygon: records.len(),
                expected: "end of stream".into(),
                actual: format!("{} trailing bit(s)", buf.remaining()),
            });
        }
        buf.rewind();

        debug!(
            "encoded {} polygon(s) into {} bit(s)",
            records.len(),
            buf.len()
        );
        Ok(buf)
    }

    /// Compare fields read back from the stream with the live model values they stand for.
    fn check_against_model(
        &self,
        index: usize,
        polygon: &PolygonModel,
        actual: &RawPolygon,
    ) -> Result<(), AnimationError> {
        let mismatch = |what: String| AnimationError::SelfCheck {
            polygon: index,
            expected: what,
            actual: actual.to_string(),
        };
        let near = |field: u32, value: f64| (f64::from(field) - value).abs() <= ROUNDING_SLACK;

        let points: Vec<Coordinate> = polygon.coords();
        if points.len() != actual.points.len() {
            return Err(mismatch(format!("{} point(s)", points.len())));
        }
        for (c, &(x, y)) in points.iter().zip(&actual.points) {
            if !near(x, c.x()) || !near(y, c.y()) {
                return Err(mismatch(format!("point {:?}", c.to_array())));
            }
        }

        let offset = self.model.config().position_bounds.min;
        let positions = self.model.position_keyframes_for(polygon.id());
        if positions.len() != actual.positions.len() {
            return Err(mismatch(format!("{} position keyframe(s)", positions.len())));
        }
        for (k, raw) in positions.iter().zip(&actual.positions) {
            let shifted = k.position.subtract(offset);
            if raw.frame as usize != k.frame || !near(raw.x, shifted.x()) || !near(raw.y, shifted.y())
            {
                return Err(mismatch(format!(
                    "position {:?} at frame {}",
                    k.position.to_array(),
                    k.frame
                )));
            }
        }

        let rotations = self.model.rotation_keyframes_for(polygon.id());
        if rotations.len() != actual.rotations.len() {
            return Err(mismatch(format!("{} rotation keyframe(s)", rotations.len())));
        }
        for (k, raw) in rotations.iter().zip(&actual.rotations) {
            // Quantization floors, so the model angle lies within one step above the field.
            let error = k.rotation.radians() - angle_from_512(raw.angle512);
            if raw.frame as usize != k.frame || !(-1e-9..=angle_step() + 1e-9).contains(&error) {
                return Err(mismatch(format!(
                    "rotation {} at frame {}",
                    k.rotation.radians(),
                    k.frame
                )));
            }
        }
        Ok(())
    }

    pub fn encode_bytes(&self) -> Result<Vec<u8>, AnimationError> {
        Ok(self.encode()?.to_byte_array())
    }

    pub fn encode_base64(&self) -> Result<String, AnimationError> {
        Ok(self.encode()?.to_base64())
    }

    /// Bytes as a one-char-per-byte string, the form QR encoders take.
    pub fn encode_binary_string(&self) -> Result<String, AnimationError> {
        Ok(bytes_to_binary_string(&self.encode_bytes()?))
    }
}
