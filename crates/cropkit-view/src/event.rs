//! Gesture events.
//!
//! Hosts translate their native scroll and pinch callbacks into this enum
//! and feed them to the controller's single dispatch point,
//! [`Cropper::handle`](crate::controller::Cropper::handle). Keeping every
//! interaction on one seam makes phase transitions observable from tests.

use cropkit_core::geometry::{Point, Size};

/// Viewport interaction delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// The widget was laid out or resized.
    BoundsChanged(Size),
    /// A pan gesture started.
    PanBegan,
    /// The scroll position changed mid-pan.
    PanChanged { content_offset: Point },
    /// The pan gesture ended.
    PanEnded,
    /// A pinch gesture started.
    ZoomBegan,
    /// The zoom factor changed mid-pinch.
    ZoomChanged { zoom_scale: f32 },
    /// The pinch gesture ended.
    ZoomEnded,
    /// Another entry of the configured shape list was selected.
    ShapeSelected { index: usize },
}
