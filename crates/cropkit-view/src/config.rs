//! Widget configuration.

use cropkit_core::pattern::{CropMode, ShapeOption};

use crate::style::OverlayStyle;

/// Configuration handed to the crop controller at construction.
///
/// `device_pixel_scale` is the host display's pixel density; it is threaded
/// through explicitly instead of being read from ambient platform state, so
/// headless renders and tests stay deterministic.
#[derive(Debug, Clone)]
pub struct CropperConfig {
    /// Shapes the user can pick from; index 0 is active initially.
    pub shape_options: Vec<ShapeOption>,
    /// Whether commits honor the exact outline or only its footprint.
    pub mode: CropMode,
    /// Upper zoom bound; the lower bound is derived from coverage.
    pub maximum_zoom: f32,
    /// Physical pixels per point of the host display.
    pub device_pixel_scale: f32,
    pub style: OverlayStyle,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            shape_options: vec![ShapeOption::square()],
            mode: CropMode::default(),
            maximum_zoom: 5.0,
            device_pixel_scale: 1.0,
            style: OverlayStyle::default(),
        }
    }
}
