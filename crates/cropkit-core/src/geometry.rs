//! Plain geometry types shared across the workspace.
//!
//! All coordinates are `f32` because the raster backend (tiny-skia) is
//! `f32`-native. The origin is the top-left corner and `y` grows downward,
//! in every coordinate space this crate deals with.

use serde::{Deserialize, Serialize};

/// A location in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or 0 for a zero-height size.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }

    /// The shorter of the two sides.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Both sides multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }

    /// Whether either side is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rect of the given size anchored at the origin.
    pub fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// A rect of `size` centered within `container`.
    pub fn centered_in(size: Size, container: Rect) -> Self {
        Self {
            origin: Point::new(
                container.min_x() + (container.width() - size.width) / 2.0,
                container.min_y() + (container.height() - size.height) / 2.0,
            ),
            size,
        }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Whether the rect has no area.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// The rect shrunk by `d` on every edge. Negative `d` grows it.
    pub fn inset(&self, d: f32) -> Rect {
        Rect::new(
            self.origin.x + d,
            self.origin.y + d,
            self.size.width - 2.0 * d,
            self.size.height - 2.0 * d,
        )
    }

    /// Convert to a tiny-skia rect.
    ///
    /// Returns `None` for empty or non-finite rects, which tiny-skia rejects.
    pub fn to_skia(&self) -> Option<tiny_skia::Rect> {
        if self.is_empty() {
            return None;
        }
        tiny_skia::Rect::from_xywh(
            self.origin.x,
            self.origin.y,
            self.size.width,
            self.size.height,
        )
    }
}

/// Per-edge distances, used for the directional overflow math of the
/// viewport layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    /// All edges zero.
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same distance on every edge.
    pub fn uniform(d: f32) -> Self {
        Self::new(d, d, d, d)
    }

    /// Combined left and right distances.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Combined top and bottom distances.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
