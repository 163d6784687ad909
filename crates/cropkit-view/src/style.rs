//! Overlay styling.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Visual styling of the crop overlay.
///
/// The defaults dim everything outside the shape with half-transparent
/// black, stroke a hairline half-transparent white border, and show two
/// grid lines per axis while a gesture is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Dim color painted outside the crop shape.
    pub overlay_color: Rgba,
    /// Stroke color of the shape outline.
    pub border_color: Rgba,
    /// Stroke width of the shape outline, in points.
    pub border_width: f32,
    /// Inward inset keeping the stroke off the viewport edges. Also applied
    /// to the committed crop region.
    pub border_inset: f32,
    /// Blur sigma for the dim layer; 0 disables the blur.
    pub blur_radius: f32,
    /// Color behind the image, for hosts to paint where nothing covers.
    pub backdrop_color: Rgba,
    /// Grid lines per axis shown while a gesture is active.
    pub grid_line_count: u32,
    pub grid_line_color: Rgba,
    pub grid_line_width: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            overlay_color: Rgba::BLACK.with_alpha(128),
            border_color: Rgba::WHITE.with_alpha(128),
            border_width: 1.0,
            border_inset: 1.0,
            blur_radius: 0.0,
            backdrop_color: Rgba::BLACK,
            grid_line_count: 2,
            grid_line_color: Rgba::WHITE.with_alpha(128),
            grid_line_width: 1.0,
        }
    }
}
