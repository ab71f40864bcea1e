//! Reads the packed stream back into polygons and keyframes, and writes the two CSV
//! tables a playback viewer ingests.
//!
//! Decoding stops at a zero point count or when fewer than 4 bits are left; both
//! happen naturally at the zero-padding of the final byte.

use log::debug;
use spranim_codec_core::{decode_base64, BitBuffer, BitOrder};

use crate::angle::Angle;
use crate::config::{Config, KEYFRAMES};
use crate::coordinate::Coordinate;
use crate::error::AnimationError;
use crate::frame::{PositionKeyFrame, RotationKeyFrame};
use crate::scene::{SceneDescription, ScenePolygon, ScenePosition, SceneRotation};
use crate::wire::{angle_from_512, read_polygon_body, RawPolygon, NUM_POINTS_BITS};

#[derive(Clone, Debug, PartialEq)]
pub struct DecodedPolygon {
    pub points: Vec<Coordinate>,
    pub positions: Vec<PositionKeyFrame>,
    pub rotations: Vec<RotationKeyFrame>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedAnimation {
    pub polygons: Vec<DecodedPolygon>,
}

#[derive(Clone, Debug)]
pub struct AnimationDecoder {
    offset: Coordinate,
}

impl Default for AnimationDecoder {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AnimationDecoder {
    /// Position fields are shifted back by `config.position_bounds.min`.
    pub fn new(config: &Config) -> Self {
        Self {
            offset: config.position_bounds.min,
        }
    }

    pub fn decode(&self, buf: &mut BitBuffer) -> Result<DecodedAnimation, AnimationError> {
        let mut out = DecodedAnimation::default();
        while buf.remaining() >= NUM_POINTS_BITS as usize {
            let num_points = buf.read_bits(NUM_POINTS_BITS)?;
            if num_points == 0 {
                break;
            }
            let raw = read_polygon_body(buf, num_points)?;
            out.polygons.push(self.lift(&raw));
        }
        debug!("decoded {} polygon(s)", out.polygons.len());
        Ok(out)
    }

    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedAnimation, AnimationError> {
        self.decode(&mut BitBuffer::from_bytes(bytes, BitOrder::Big))
    }

    pub fn decode_base64(&self, text: &str) -> Result<DecodedAnimation, AnimationError> {
        self.decode_bytes(&decode_base64(text)?)
    }

    fn lift(&self, raw: &RawPolygon) -> DecodedPolygon {
        DecodedPolygon {
            points: raw
                .points
                .iter()
                .map(|&(x, y)| Coordinate::new(f64::from(x), f64::from(y)))
                .collect(),
            positions: raw
                .positions
                .iter()
                .map(|k| PositionKeyFrame {
                    frame: k.frame as usize,
                    position: Coordinate::new(f64::from(k.x), f64::from(k.y)).translate(self.offset),
                })
                .collect(),
            rotations: raw
                .rotations
                .iter()
                .map(|k| RotationKeyFrame {
                    frame: k.frame as usize,
                    rotation: Angle::from_radians(angle_from_512(k.angle512)),
                })
                .collect(),
        }
    }
}

impl DecodedAnimation {
    pub fn to_scene(&self) -> SceneDescription {
        SceneDescription {
            polygons: self
                .polygons
                .iter()
                .map(|p| ScenePolygon {
                    points: p.points.clone(),
                    position_keyframes: p
                        .positions
                        .iter()
                        .map(|k| ScenePosition {
                            frame: k.frame,
                            position: k.position,
                        })
                        .collect(),
                    rotation_keyframes: p
                        .rotations
                        .iter()
                        .map(|k| SceneRotation {
                            frame: k.frame,
                            radians: k.rotation.radians(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// One row per polygon: the point count followed by `x,y` pairs, each point offset by
    /// the polygon's first position keyframe.
    pub fn polygons_csv(&self) -> String {
        let mut out = String::new();
        for polygon in &self.polygons {
            let anchor = polygon
                .positions
                .first()
                .map_or(Coordinate::ORIGIN, |k| k.position);
            let mut cells = vec![polygon.points.len().to_string()];
            for p in &polygon.points {
                let moved = p.translate(anchor);
                cells.push(moved.x().to_string());
                cells.push(moved.y().to_string());
            }
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    /// Three rows per polygon (`x`, `y`, `rotation`), each a label plus one cell per frame.
    /// Frames without a keyframe are left empty.
    pub fn animation_csv(&self) -> String {
        let mut out = String::new();
        for polygon in &self.polygons {
            let mut xs = vec![String::new(); KEYFRAMES];
            let mut ys = vec![String::new(); KEYFRAMES];
            let mut rs = vec![String::new(); KEYFRAMES];
            for k in &polygon.positions {
                if let (Some(x), Some(y)) = (xs.get_mut(k.frame), ys.get_mut(k.frame)) {
                    *x = k.position.x().to_string();
                    *y = k.position.y().to_string();
                }
            }
            for k in &polygon.rotations {
                if let Some(r) = rs.get_mut(k.frame) {
                    *r = k.rotation.radians().to_string();
                }
            }
            for (label, row) in [("x", xs), ("y", ys), ("rotation", rs)] {
                out.push_str(label);
                for cell in row {
                    out.push(',');
                    out.push_str(&cell);
                }
                out.push('\n');
            }
        }
        out
    }
}
