use spranim_codec_core::BitBufferError;
use thiserror::Error;

use crate::config::KEYFRAMES;
use crate::ids::{PointId, PolygonId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("unknown polygon {0}")]
    UnknownPolygon(PolygonId),

    #[error("polygon {polygon} has no point {point}")]
    UnknownPoint { polygon: PolygonId, point: PointId },

    #[error("frame {frame} is outside 0..{}", KEYFRAMES)]
    FrameOutOfRange { frame: usize },

    #[error("polygon {0} has no points to encode")]
    EmptyPolygon(PolygonId),

    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: i64,
        bits: u32,
    },

    #[error("encoder self-check failed on polygon {polygon}: wrote {expected}, read back {actual}")]
    SelfCheck {
        polygon: usize,
        expected: String,
        actual: String,
    },

    #[error(transparent)]
    Bits(#[from] BitBufferError),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("invalid scene: {0}")]
    Scene(String),

    #[error("csv line {line}: {reason}")]
    Csv { line: usize, reason: String },
}
