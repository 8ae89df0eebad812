/// Errors that can occur while building or encoding a drawing.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// PNG encoding of the raster failed.
    #[error("image encode failed: {0}")]
    Encode(#[from] image::ImageError),

    /// A raster was requested larger than [`MAX_DIMENSION`](crate::MAX_DIMENSION)
    /// on a side, or with a zero side.
    #[error("unsupported canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// A color string was not `#rrggbb`.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),
}
