//! Viewport layout engine.
//!
//! Tracks pan/zoom state for the image behind a crop shape and answers the
//! two questions interactive cropping keeps asking: how large must the
//! scrollable content be so the crop placement stays covered at every
//! reachable pan position, and what does the committed crop transform look
//! like. The engine owns no host handles; hosts feed it bounds, gesture
//! values, and the bound image's pixel size, then read plain geometry back.
//!
//! State machine: `Idle -> Dragging -> Idle` for pans and
//! `Idle -> Zooming -> Settling -> Idle` for zooms. `Settling` exists so a
//! release near minimum zoom snaps exactly onto it before the engine
//! reports idle geometry again.
//!
//! Inputs mutate through explicit setters that only invalidate; geometry is
//! rebuilt by [`Viewport::recompute`], so there are no hidden recomputation
//! chains hanging off field writes.

use cropkit_core::geometry::{EdgeInsets, Point, Rect, Size};
use log::debug;

/// Zoom distance from the minimum within which a released pinch snaps onto
/// the minimum exactly.
const SETTLE_EPSILON: f32 = 1e-2;

/// Interaction phase of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
    Zooming,
    Settling,
}

impl Phase {
    /// Whether a gesture is actively changing the viewport.
    pub fn is_modifying(&self) -> bool {
        matches!(self, Phase::Dragging | Phase::Zooming)
    }
}

/// Raw scroll/zoom state mirrored between the host and the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Current zoom factor, kept within `[minimum_zoom, maximum_zoom]`.
    pub zoom_scale: f32,
    /// Scroll position inside the content, in screen points.
    pub content_offset: Point,
    /// Scrollable content size at the current zoom, in screen points.
    pub content_size: Size,
    /// Size of the visible viewport, in points.
    pub bounds_size: Size,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom_scale: 1.0,
            content_offset: Point::ZERO,
            content_size: Size::ZERO,
            bounds_size: Size::ZERO,
        }
    }
}

/// Geometry produced by a content pass.
///
/// All `required`/`additional`/`image_frame` values are in unscaled content
/// units (the image's natural point space); `scaled_image_size`,
/// `content_size`, and the offsets are in screen points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentLayout {
    /// Image size at the current zoom.
    pub scaled_image_size: Size,
    /// Offset centering the scaled image inside the bounds; negative on an
    /// axis where the image overflows them.
    pub image_offset: Point,
    /// Directional overflow between the crop placement and the scaled
    /// image, each side widened by the border inset.
    pub preview_insets: EdgeInsets,
    /// Wrapper size keeping the placement covered at every pan position.
    pub required_size: Size,
    /// Extra wrapper size beyond the natural point size, used to center the
    /// image sub-frame.
    pub additional_size: Size,
    /// Frame of the image inside the wrapper.
    pub image_frame: Rect,
    /// `required_size` scaled back to screen points.
    pub content_size: Size,
    /// Offset aligning the placement's top-left with the overflow; applied
    /// on shape changes and settles.
    pub aligned_offset: Point,
}

/// Stateful pan/zoom geometry for one crop viewport.
pub struct Viewport {
    state: ViewportState,
    phase: Phase,
    minimum_zoom: f32,
    maximum_zoom: f32,
    border_inset: f32,
    placement: Rect,
    image_size: Option<Size>,
    layout: Option<ContentLayout>,
}

impl Viewport {
    pub fn new(maximum_zoom: f32, border_inset: f32) -> Self {
        Self {
            state: ViewportState::default(),
            phase: Phase::Idle,
            minimum_zoom: 1.0,
            maximum_zoom,
            border_inset,
            placement: Rect::default(),
            image_size: None,
            layout: None,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a pan or pinch is in progress (grid lines are shown, commits
    /// are forced).
    pub fn is_modifying(&self) -> bool {
        self.phase.is_modifying()
    }

    pub fn minimum_zoom(&self) -> f32 {
        self.minimum_zoom
    }

    /// Geometry from the last [`recompute`](Self::recompute), if inputs
    /// were complete.
    pub fn layout(&self) -> Option<&ContentLayout> {
        self.layout.as_ref()
    }

    /// The bound image's natural size in points: viewport width minus the
    /// border inset on both sides, height following the image's pixel
    /// aspect ratio. `None` until an image is bound or while the bounds are
    /// too small to matter.
    pub fn point_image_size(&self) -> Option<Size> {
        let image = self.image_size?;
        if image.is_empty() {
            return None;
        }
        let width = self.state.bounds_size.width - 2.0 * self.border_inset;
        if width <= 0.0 {
            return None;
        }
        Some(Size::new(width, width / image.aspect_ratio()))
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        self.state.bounds_size = bounds;
        self.invalidate();
    }

    /// Install the active crop pattern's placement rect.
    pub fn set_placement(&mut self, placement: Rect) {
        self.placement = placement;
        self.invalidate();
    }

    /// Bind (or clear) the displayed image's natural pixel size.
    pub fn set_image_size(&mut self, image_size: Option<Size>) {
        self.image_size = image_size;
        self.invalidate();
    }

    /// Drop cached geometry. Callers follow up with
    /// [`recompute`](Self::recompute) once all inputs are in place.
    pub fn invalidate(&mut self) {
        self.layout = None;
    }

    /// Rebuild minimum zoom and content geometry from the current inputs.
    ///
    /// # Arguments
    ///
    /// * `realign` - Reset the content offset so the placement's top-left
    ///   coincides with the computed overflow (shape changes and settles)
    ///
    /// Skipped entirely while no image is bound or the geometry is
    /// degenerate; the previous state stays untouched in that case.
    pub fn recompute(&mut self, realign: bool) {
        let point_image = match self.point_image_size() {
            Some(size) if !self.placement.is_empty() => size,
            _ => {
                self.layout = None;
                return;
            }
        };

        let minimum = Self::coverage_zoom(self.placement, point_image);
        if minimum != self.minimum_zoom {
            debug!(
                "minimum zoom {:.4} -> {:.4}",
                self.minimum_zoom, minimum
            );
            self.minimum_zoom = minimum;
        }
        let ceiling = self.maximum_zoom.max(self.minimum_zoom);
        let clamped = self.state.zoom_scale.clamp(self.minimum_zoom, ceiling);
        if clamped != self.state.zoom_scale {
            debug!(
                "zoom {:.4} clamped into [{:.4}, {:.4}]",
                self.state.zoom_scale, self.minimum_zoom, ceiling
            );
            self.state.zoom_scale = clamped;
        }

        let layout = Self::content_layout(
            self.placement,
            point_image,
            self.state.bounds_size,
            self.state.zoom_scale,
            self.border_inset,
        );
        self.state.content_size = layout.content_size;
        if realign {
            self.state.content_offset = layout.aligned_offset;
        }
        self.layout = Some(layout);
        self.clamp_offset();
    }

    /// First-load defaults: zoom at the coverage minimum, offset aligned.
    pub fn reset(&mut self) {
        self.recompute(false);
        self.state.zoom_scale = self.minimum_zoom;
        self.recompute(true);
    }

    pub fn begin_drag(&mut self) {
        self.transition(Phase::Dragging);
    }

    pub fn drag_to(&mut self, content_offset: Point) {
        self.state.content_offset = content_offset;
        self.recompute(false);
    }

    pub fn end_drag(&mut self) {
        self.transition(Phase::Idle);
    }

    pub fn begin_zoom(&mut self) {
        self.transition(Phase::Zooming);
    }

    pub fn zoom_to(&mut self, zoom_scale: f32) {
        self.state.zoom_scale = zoom_scale;
        self.recompute(false);
    }

    /// End a pinch: pass through `Settling`, snapping onto the minimum zoom
    /// when the release landed within [`SETTLE_EPSILON`] of it.
    pub fn end_zoom(&mut self) {
        self.transition(Phase::Settling);
        let snap = (self.state.zoom_scale - self.minimum_zoom).abs() < SETTLE_EPSILON;
        if snap && self.state.zoom_scale != self.minimum_zoom {
            debug!(
                "settling zoom {:.4} onto minimum {:.4}",
                self.state.zoom_scale, self.minimum_zoom
            );
        }
        if snap {
            self.state.zoom_scale = self.minimum_zoom;
        }
        self.recompute(snap);
        self.transition(Phase::Idle);
    }

    fn transition(&mut self, next: Phase) {
        if next != self.phase {
            debug!("viewport phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    /// Smallest zoom at which the point-size image covers the placement
    /// rect on both axes (aspect-fill).
    fn coverage_zoom(placement: Rect, point_image: Size) -> f32 {
        (placement.width() / point_image.width).max(placement.height() / point_image.height)
    }

    /// One content pass: measure the four directional overflows between the
    /// placement and the scaled image, inflate the wrapper by them so every
    /// pan position keeps the placement covered, and center the image
    /// sub-frame in the slack that remains.
    fn content_layout(
        placement: Rect,
        point_image: Size,
        bounds: Size,
        zoom: f32,
        inset: f32,
    ) -> ContentLayout {
        let scaled = point_image.scaled(zoom);
        let image_offset = Point::new(
            (bounds.width - scaled.width) / 2.0,
            (bounds.height - scaled.height) / 2.0,
        );
        let insets = Self::preview_insets(placement, scaled, image_offset, bounds, inset);
        let required = Size::new(
            (scaled.width.max(bounds.width) + insets.horizontal()) / zoom,
            (scaled.height.max(bounds.height) + insets.vertical()) / zoom,
        );
        let additional = Size::new(
            required.width - point_image.width - insets.horizontal() / zoom,
            required.height - point_image.height - insets.vertical() / zoom,
        );
        let image_frame = Rect::new(
            insets.left / zoom + additional.width / 2.0,
            insets.top / zoom + additional.height / 2.0,
            point_image.width,
            point_image.height,
        );

        ContentLayout {
            scaled_image_size: scaled,
            image_offset,
            preview_insets: insets,
            required_size: required,
            additional_size: additional,
            image_frame,
            content_size: required.scaled(zoom),
            aligned_offset: Point::new(insets.left, insets.top),
        }
    }

    /// Overflow of the placement rect past the scaled image on each side,
    /// measured in screen points and widened by the border inset. Where the
    /// image overflows the bounds instead, the bounds edge is the limit.
    fn preview_insets(
        placement: Rect,
        scaled: Size,
        offset: Point,
        bounds: Size,
        inset: f32,
    ) -> EdgeInsets {
        let bottom_edge = if offset.y > 0.0 {
            offset.y + scaled.height
        } else {
            bounds.height
        };
        let right_edge = if offset.x > 0.0 {
            offset.x + scaled.width
        } else {
            bounds.width
        };
        EdgeInsets::new(
            placement.min_y() - offset.y.max(0.0) + inset,
            placement.min_x() - offset.x.max(0.0) + inset,
            bottom_edge - placement.max_y() + inset,
            right_edge - placement.max_x() + inset,
        )
    }

    /// Keep the offset inside the scrollable range `[0, content - bounds]`.
    fn clamp_offset(&mut self) {
        let max_x = (self.state.content_size.width - self.state.bounds_size.width).max(0.0);
        let max_y = (self.state.content_size.height - self.state.bounds_size.height).max(0.0);
        self.state.content_offset = Point::new(
            self.state.content_offset.x.clamp(0.0, max_x),
            self.state.content_offset.y.clamp(0.0, max_y),
        );
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
