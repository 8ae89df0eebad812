//! Stroke capture and drawing artifacts for the Drawl client.
//!
//! - [`StrokeCanvas`] records pointer gestures as [`Stroke`]s in a fixed
//!   logical space ([`LOGICAL_SIZE`]), with undo and clear.
//! - [`Raster`] replays strokes into pixels deterministically.
//! - [`StrokeCanvas::take_artifact`] produces the PNG data URL that is
//!   sent as a drawing submission.
//!
//! The crate has no knowledge of the network or of game state.

mod error;
mod model;
mod raster;
mod stroke;

pub use error::CanvasError;
pub use model::{StrokeCanvas, BACKGROUND};
pub use raster::{Raster, DATA_URL_PREFIX, MAX_DIMENSION};
pub use stroke::{
    map_point, Brush, CanvasSize, Color, Point, Stroke, ViewRect, BRUSH_SIZES, ERASER_WIDTH,
    LOGICAL_SIZE, PALETTE,
};
