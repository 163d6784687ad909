//! Crop shapes and normalized outline construction.
//!
//! Shape outlines are normalized: a pattern's path always lives in the unit
//! frame `[0,1]x[0,1]` and is scaled into a concrete frame only when a
//! consumer materializes it. One pattern therefore serves both the on-screen
//! preview and the full-resolution crop without being rebuilt.

use std::fmt;
use std::sync::Arc;

use crate::error::CropError;
use crate::geometry::{Point, Rect, Size};
use crate::pattern::{CropMode, CropPattern};

/// Outline family drawn into a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Axis-aligned rectangle filling the frame.
    Rectangle,
    /// Ellipse inscribed in the frame.
    Ellipse,
}

/// A shape outline normalized to the unit frame.
#[derive(Clone)]
pub struct ShapePath {
    source: PathSource,
}

#[derive(Clone)]
enum PathSource {
    /// Built-in outline, constructed directly at the target frame.
    Kind(PathKind),
    /// Caller-supplied outline, already normalized to the unit frame.
    Custom(tiny_skia::Path),
}

impl ShapePath {
    /// The unit rectangle or the inscribed unit ellipse.
    pub fn unit(kind: PathKind) -> Self {
        Self {
            source: PathSource::Kind(kind),
        }
    }

    /// Wrap an outline that is already normalized to the unit frame.
    pub fn from_normalized(path: tiny_skia::Path) -> Self {
        Self {
            source: PathSource::Custom(path),
        }
    }

    /// Whether this outline is the plain rectangle.
    ///
    /// Bounding-rect crops of a rectangular outline can skip the mask pass.
    pub fn is_rectangular(&self) -> bool {
        matches!(self.source, PathSource::Kind(PathKind::Rectangle))
    }

    /// Materialize the outline scaled to `size`, anchored at the origin.
    pub fn materialized(&self, size: Size) -> Result<tiny_skia::Path, CropError> {
        self.materialized_in(Rect::from_size(size))
    }

    /// Materialize the outline scaled and translated into `frame`.
    pub fn materialized_in(&self, frame: Rect) -> Result<tiny_skia::Path, CropError> {
        let target = frame.to_skia().ok_or(CropError::DegenerateGeometry)?;
        match &self.source {
            PathSource::Kind(kind) => {
                let mut pb = tiny_skia::PathBuilder::new();
                match kind {
                    PathKind::Rectangle => pb.push_rect(target),
                    PathKind::Ellipse => pb.push_oval(target),
                }
                pb.finish().ok_or(CropError::PathConstruction)
            }
            PathSource::Custom(path) => {
                let unit_to_frame = tiny_skia::Transform::from_scale(frame.width(), frame.height())
                    .post_translate(frame.min_x(), frame.min_y());
                path.clone()
                    .transform(unit_to_frame)
                    .ok_or(CropError::PathConstruction)
            }
        }
    }
}

impl fmt::Debug for ShapePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            PathSource::Kind(kind) => f.debug_tuple("ShapePath").field(kind).finish(),
            PathSource::Custom(_) => f.debug_tuple("ShapePath").field(&"custom").finish(),
        }
    }
}

/// Builds a crop pattern for a widget's bounds.
///
/// Implementations decide where the crop region sits within the bounds and
/// which outline fills it. Built-in shapes all go through
/// [`AspectRatioPatternBuilder`]; implement this trait for anything beyond
/// aspect-constrained rectangles and ellipses.
pub trait PatternBuilder {
    /// Build the pattern for the given widget bounds.
    fn make_pattern(&self, bounds: Rect) -> CropPattern;

    /// The largest rect of the given aspect ratio centered in `bounds`.
    ///
    /// Tries the full bounds width first; when the implied height does not
    /// fit, falls back to the full height. An exact fit keeps the
    /// width-constrained answer.
    fn fit_rect(&self, aspect_ratio: f32, bounds: Rect) -> Rect {
        let mut width = bounds.width();
        let mut height = width / aspect_ratio;
        if height > bounds.height() {
            height = bounds.height();
            width = height * aspect_ratio;
        }
        Rect::centered_in(Size::new(width, height), bounds)
    }
}

/// The data-driven builder behind every built-in shape: an outline family
/// plus the aspect ratio of its placement rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatioPatternBuilder {
    /// Outline drawn into the placement rect.
    pub path_kind: PathKind,
    /// Width to height ratio of the placement rect.
    pub aspect_ratio: f32,
}

impl AspectRatioPatternBuilder {
    pub fn new(path_kind: PathKind, aspect_ratio: f32) -> Self {
        Self {
            path_kind,
            aspect_ratio,
        }
    }
}

impl PatternBuilder for AspectRatioPatternBuilder {
    fn make_pattern(&self, bounds: Rect) -> CropPattern {
        CropPattern {
            preview_rect: self.fit_rect(self.aspect_ratio, bounds),
            path: ShapePath::unit(self.path_kind),
            translation: Point::ZERO,
            scale: 1.0,
            mode: CropMode::default(),
        }
    }
}

/// The built-in shape selection, plus an escape hatch for custom builders.
#[derive(Clone)]
pub enum ShapeKind {
    /// 1:1 rectangle.
    Square,
    /// Rectangle with a fixed width:height ratio.
    Rect { aspect_ratio: f32 },
    /// 1:1 ellipse.
    Circle,
    /// Ellipse with a fixed width:height ratio.
    Ellipse { aspect_ratio: f32 },
    /// Caller-supplied pattern construction.
    Custom(Arc<dyn PatternBuilder>),
}

impl ShapeKind {
    /// Build the pattern this shape produces for the given bounds.
    pub fn make_pattern(&self, bounds: Rect) -> CropPattern {
        match self {
            ShapeKind::Square => {
                AspectRatioPatternBuilder::new(PathKind::Rectangle, 1.0).make_pattern(bounds)
            }
            ShapeKind::Rect { aspect_ratio } => {
                AspectRatioPatternBuilder::new(PathKind::Rectangle, *aspect_ratio)
                    .make_pattern(bounds)
            }
            ShapeKind::Circle => {
                AspectRatioPatternBuilder::new(PathKind::Ellipse, 1.0).make_pattern(bounds)
            }
            ShapeKind::Ellipse { aspect_ratio } => {
                AspectRatioPatternBuilder::new(PathKind::Ellipse, *aspect_ratio)
                    .make_pattern(bounds)
            }
            ShapeKind::Custom(builder) => builder.make_pattern(bounds),
        }
    }
}

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Square => write!(f, "Square"),
            ShapeKind::Rect { aspect_ratio } => f
                .debug_struct("Rect")
                .field("aspect_ratio", aspect_ratio)
                .finish(),
            ShapeKind::Circle => write!(f, "Circle"),
            ShapeKind::Ellipse { aspect_ratio } => f
                .debug_struct("Ellipse")
                .field("aspect_ratio", aspect_ratio)
                .finish(),
            ShapeKind::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_rect_width_constrained() {
        let builder = AspectRatioPatternBuilder::new(PathKind::Rectangle, 2.0);
        let rect = builder.fit_rect(2.0, Rect::new(0.0, 0.0, 100.0, 200.0));

        // Full width, height = 100 / 2, centered vertically
        assert_eq!(rect, Rect::new(0.0, 75.0, 100.0, 50.0));
    }

    #[test]
    fn test_fit_rect_height_constrained() {
        let builder = AspectRatioPatternBuilder::new(PathKind::Rectangle, 0.5);
        let rect = builder.fit_rect(0.5, Rect::new(0.0, 0.0, 100.0, 120.0));

        // Full width would need height 200; falls back to full height
        assert_eq!(rect, Rect::new(20.0, 0.0, 60.0, 120.0));
    }

    #[test]
    fn test_fit_rect_exact_fit_keeps_width() {
        let builder = AspectRatioPatternBuilder::new(PathKind::Rectangle, 1.0);
        let rect = builder.fit_rect(1.0, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_fit_rect_respects_bounds_origin() {
        let builder = AspectRatioPatternBuilder::new(PathKind::Rectangle, 1.0);
        let rect = builder.fit_rect(1.0, Rect::new(10.0, 20.0, 100.0, 200.0));
        assert_eq!(rect, Rect::new(10.0, 70.0, 100.0, 100.0));
    }

    #[test]
    fn test_square_pattern_fills_square_bounds() {
        let pattern = ShapeKind::Square.make_pattern(Rect::new(0.0, 0.0, 300.0, 300.0));
        assert_eq!(pattern.preview_rect, Rect::new(0.0, 0.0, 300.0, 300.0));
        assert_eq!(pattern.translation, Point::ZERO);
        assert_eq!(pattern.scale, 1.0);
        assert!(pattern.path.is_rectangular());
    }

    #[test]
    fn test_circle_pattern_is_not_rectangular() {
        let pattern = ShapeKind::Circle.make_pattern(Rect::new(0.0, 0.0, 300.0, 300.0));
        assert!(!pattern.path.is_rectangular());
    }

    #[test]
    fn test_materialized_rectangle_bounds() {
        let path = ShapePath::unit(PathKind::Rectangle)
            .materialized(Size::new(287.0, 269.0))
            .unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.x(), 0.0);
        assert_eq!(bounds.y(), 0.0);
        assert_eq!(bounds.width(), 287.0);
        assert_eq!(bounds.height(), 269.0);
    }

    #[test]
    fn test_materialized_ellipse_bounds_match_frame() {
        let path = ShapePath::unit(PathKind::Ellipse)
            .materialized_in(Rect::new(10.0, 20.0, 100.0, 50.0))
            .unwrap();
        let bounds = path.bounds();
        assert!((bounds.x() - 10.0).abs() < 1e-4);
        assert!((bounds.y() - 20.0).abs() < 1e-4);
        assert!((bounds.width() - 100.0).abs() < 1e-4);
        assert!((bounds.height() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_materialized_rejects_empty_frame() {
        let result = ShapePath::unit(PathKind::Rectangle).materialized(Size::ZERO);
        assert!(matches!(result, Err(CropError::DegenerateGeometry)));
    }

    #[test]
    fn test_custom_normalized_path_scales_into_frame() {
        // A diamond inscribed in the unit frame
        let mut pb = tiny_skia::PathBuilder::new();
        pb.move_to(0.5, 0.0);
        pb.line_to(1.0, 0.5);
        pb.line_to(0.5, 1.0);
        pb.line_to(0.0, 0.5);
        pb.close();
        let diamond = ShapePath::from_normalized(pb.finish().unwrap());

        let path = diamond
            .materialized_in(Rect::new(100.0, 0.0, 200.0, 100.0))
            .unwrap();
        let bounds = path.bounds();
        assert!((bounds.x() - 100.0).abs() < 1e-4);
        assert!((bounds.width() - 200.0).abs() < 1e-4);
        assert!((bounds.height() - 100.0).abs() < 1e-4);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
