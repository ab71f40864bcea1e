//! spranim animation core
//!
//! Editor-side data model and codec for 64-frame polygon animations:
//! - [`FrameModel`] owns polygons and per-frame position/rotation keyframes, and answers
//!   interpolated pose queries.
//! - [`AnimationEncoder`] packs a model into the fixed-width bitstream of [`wire`];
//!   [`AnimationDecoder`] reads it back and exports CSV for viewers.
//! - [`AnimationModel`] is the viewer-side dual, rebuilt from that CSV.
//! - [`Previewer`] and [`DrawTimer`] drive timeline playback over the [`EditorBus`].

pub mod angle;
pub mod config;
pub mod coordinate;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod events;
pub mod frame;
pub mod frame_model;
pub mod ids;
pub mod interp;
pub mod playback;
pub mod polygon;
pub mod preview;
pub mod scene;
pub mod wire;

pub use angle::Angle;
pub use config::{Bounds, Config, DEFAULT_FPS, KEYFRAMES};
pub use coordinate::Coordinate;
pub use decoder::{AnimationDecoder, DecodedAnimation, DecodedPolygon};
pub use encoder::AnimationEncoder;
pub use error::AnimationError;
pub use events::{EditorBus, EventPayload};
pub use frame::{Frame, PositionKeyFrame, RotationKeyFrame};
pub use frame_model::{FrameModel, START_POSITION, START_ROTATION};
pub use ids::{PointId, PolygonId};
pub use playback::{AnimationModel, PlaybackObject, RowLayout};
pub use polygon::PolygonModel;
pub use preview::{DrawTimer, Previewer};
pub use scene::{SceneDescription, ScenePolygon, ScenePosition, SceneRotation};
pub use wire::RawPolygon;
