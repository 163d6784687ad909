//! Error types for crop and rendering operations.

use thiserror::Error;

/// Error types for crop compositing and overlay rendering.
#[derive(Debug, Error)]
pub enum CropError {
    /// The crop region has no area.
    #[error("Crop region has a degenerate (zero-area) bounding box")]
    DegenerateGeometry,

    /// The source bitmap has no pixels.
    #[error("Source image is empty")]
    EmptyImage,

    /// The raster backend refused to allocate a surface.
    #[error("Could not allocate a {width}x{height} surface")]
    AllocationFailed { width: u32, height: u32 },

    /// A shape outline could not be built or transformed.
    #[error("Shape path construction failed")]
    PathConstruction,
}
