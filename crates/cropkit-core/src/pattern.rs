//! Crop patterns: where a crop region sits and how it maps onto a source
//! image.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::shape::{ShapeKind, ShapePath};

/// How the cropper interprets a pattern's outline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropMode {
    /// Crop the outline's axis-aligned bounding rectangle. The shape's
    /// silhouette is ignored; only its footprint matters. This is the cheap
    /// path for plain rectangular crops.
    #[default]
    BoundingRect,
    /// Crop the outline itself; pixels outside it come out transparent.
    Path,
}

/// A placed crop region.
///
/// `preview_rect` positions the region in widget point space; the outline
/// stays normalized until a consumer materializes it at the preview size.
/// `translation` and `scale` start as the identity and are filled in by the
/// viewport engine when the pattern is committed against a source bitmap:
/// the translation carries the pan offset in point space and the scale maps
/// translated points into source pixels. Translation applies before scale.
#[derive(Debug, Clone)]
pub struct CropPattern {
    /// Placement of the crop region in widget point space.
    pub preview_rect: Rect,
    /// Outline normalized to the unit frame.
    pub path: ShapePath,
    /// Pan offset captured at commit time, in points.
    pub translation: Point,
    /// Point-to-source-pixel multiplier captured at commit time.
    pub scale: f32,
    /// Bounding-rect or exact-path cropping.
    pub mode: CropMode,
}

/// A selectable crop shape with a user-facing label.
#[derive(Debug, Clone)]
pub struct ShapeOption {
    /// Label shown by shape pickers.
    pub label: String,
    /// The shape this option selects.
    pub kind: ShapeKind,
}

impl ShapeOption {
    pub fn new(label: impl Into<String>, kind: ShapeKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// A 1:1 rectangle labeled "Square".
    pub fn square() -> Self {
        Self::new("Square", ShapeKind::Square)
    }

    /// A fixed-ratio rectangle labeled "width:height".
    pub fn rect(width: u32, height: u32) -> Self {
        Self::new(
            format!("{width}:{height}"),
            ShapeKind::Rect {
                aspect_ratio: width as f32 / height as f32,
            },
        )
    }

    /// A 1:1 ellipse labeled "Circle".
    pub fn circle() -> Self {
        Self::new("Circle", ShapeKind::Circle)
    }

    /// A fixed-ratio ellipse labeled "width:height".
    pub fn ellipse(width: u32, height: u32) -> Self {
        Self::new(
            format!("{width}:{height}"),
            ShapeKind::Ellipse {
                aspect_ratio: width as f32 / height as f32,
            },
        )
    }
}
