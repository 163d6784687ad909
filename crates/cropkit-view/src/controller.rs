//! Crop controller.
//!
//! Owns one cropping session: the configured shape list, the image provider,
//! the viewport engine, and the currently displayed bitmap. Hosts feed it
//! [`GestureEvent`]s and read back overlay frames and crop results; nothing
//! else mutates the session.
//!
//! Image fetches are asynchronous. Every request carries a generation
//! number and deliveries land in an inbox; [`Cropper::pump_fetches`] applies
//! them in order and drops any delivery whose generation is no longer the
//! latest, so a slow fetch for an old zoom level can never overwrite a newer
//! variant. Synchronous providers are pumped automatically at the end of
//! each event.

use std::cell::RefCell;
use std::rc::Rc;

use cropkit_core::bitmap::Bitmap;
use cropkit_core::cropper::{crop, CropResult};
use cropkit_core::error::CropError;
use cropkit_core::geometry::Rect;
use cropkit_core::pattern::{CropPattern, ShapeOption};
use cropkit_core::provider::{best_constraint, ImageProvider, ScaleConstraint};
use cropkit_core::shape::ShapeKind;
use log::{debug, warn};

use crate::config::CropperConfig;
use crate::event::GestureEvent;
use crate::overlay::render_overlay;
use crate::viewport::Viewport;

/// Deliveries from the provider, tagged with their request generation.
type FetchInbox = Rc<RefCell<Vec<(u64, Option<Bitmap>)>>>;

/// Interactive cropping session.
pub struct Cropper {
    config: CropperConfig,
    provider: Box<dyn ImageProvider>,
    viewport: Viewport,
    shape_index: usize,
    image: Option<Bitmap>,
    requested_constraint: Option<ScaleConstraint>,
    generation: u64,
    inbox: FetchInbox,
    pending_reset: bool,
}

impl Cropper {
    /// Start a session. The first image fetch is issued immediately at the
    /// initial display scale.
    pub fn new(mut config: CropperConfig, provider: Box<dyn ImageProvider>) -> Self {
        if config.shape_options.is_empty() {
            debug!("no shapes configured; falling back to a square");
            config.shape_options.push(ShapeOption::square());
        }
        let viewport = Viewport::new(config.maximum_zoom, config.style.border_inset);
        let mut cropper = Self {
            config,
            provider,
            viewport,
            shape_index: 0,
            image: None,
            requested_constraint: None,
            generation: 0,
            inbox: Rc::new(RefCell::new(Vec::new())),
            pending_reset: true,
        };
        cropper.refresh_image();
        cropper.pump_fetches();
        cropper
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The bitmap currently displayed, once a fetch has delivered one.
    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }

    pub fn shape_index(&self) -> usize {
        self.shape_index
    }

    fn active_shape(&self) -> &ShapeKind {
        &self.config.shape_options[self.shape_index].kind
    }

    /// Single dispatch point for host interaction.
    pub fn handle(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::BoundsChanged(size) => {
                self.viewport.set_bounds(size);
                self.apply_placement();
                if self.pending_reset && self.image.is_some() && !size.is_empty() {
                    self.viewport.reset();
                    self.pending_reset = false;
                } else {
                    self.viewport.recompute(true);
                }
                self.refresh_image();
            }
            GestureEvent::PanBegan => self.viewport.begin_drag(),
            GestureEvent::PanChanged { content_offset } => self.viewport.drag_to(content_offset),
            GestureEvent::PanEnded => self.viewport.end_drag(),
            GestureEvent::ZoomBegan => self.viewport.begin_zoom(),
            GestureEvent::ZoomChanged { zoom_scale } => {
                self.viewport.zoom_to(zoom_scale);
                self.refresh_image();
            }
            GestureEvent::ZoomEnded => {
                self.viewport.end_zoom();
                self.refresh_image();
            }
            GestureEvent::ShapeSelected { index } => {
                if index >= self.config.shape_options.len() {
                    warn!(
                        "shape index {} out of range ({} configured)",
                        index,
                        self.config.shape_options.len()
                    );
                } else if index != self.shape_index {
                    debug!(
                        "shape -> {}",
                        self.config.shape_options[index].label
                    );
                    self.shape_index = index;
                    self.apply_placement();
                    self.viewport.recompute(true);
                    self.refresh_image();
                }
            }
        }
        self.pump_fetches();
    }

    /// Replace the image source, discarding the bound image and orphaning
    /// any in-flight fetch.
    pub fn set_provider(&mut self, provider: Box<dyn ImageProvider>) {
        self.provider = provider;
        self.image = None;
        self.requested_constraint = None;
        self.generation += 1;
        self.pending_reset = true;
        self.viewport.set_image_size(None);
        self.viewport.recompute(false);
        self.refresh_image();
        self.pump_fetches();
    }

    /// Apply deliveries sitting in the fetch inbox.
    ///
    /// Hosts with asynchronous providers call this once results have been
    /// handed to the fetch callbacks; with synchronous providers the event
    /// dispatch pumps on its own.
    pub fn pump_fetches(&mut self) {
        let delivered: Vec<(u64, Option<Bitmap>)> =
            self.inbox.borrow_mut().drain(..).collect();
        for (generation, image) in delivered {
            if generation != self.generation {
                warn!(
                    "dropping stale fetch delivery (generation {} behind {})",
                    generation, self.generation
                );
                continue;
            }
            match image {
                Some(bitmap) => self.bind_image(bitmap),
                // Keep the stale-but-valid bitmap over clearing the display
                None => debug!("fetch delivered nothing; keeping current image"),
            }
        }
    }

    /// Assemble the commit pattern and run the crop against the bound
    /// image. `Forced` while a gesture is still in progress.
    pub fn make_crop_result(&self) -> CropResult {
        let image = match &self.image {
            Some(image) => image,
            None => return CropResult::Undefined,
        };
        let pattern = match self.commit_pattern() {
            Some(pattern) => pattern,
            None => return CropResult::Undefined,
        };
        match crop(image, &pattern) {
            Ok(bitmap) if self.viewport.is_modifying() => CropResult::Forced(bitmap),
            Ok(bitmap) => CropResult::Normal(bitmap),
            Err(err) => {
                warn!("crop failed: {err}");
                CropResult::Undefined
            }
        }
    }

    /// Finish the session with whatever the viewport currently frames.
    pub fn accept(&self) -> CropResult {
        self.make_crop_result()
    }

    /// Render the overlay for the current shape and interaction phase.
    pub fn overlay_frame(&self) -> Result<Bitmap, CropError> {
        let bounds = self.viewport.state().bounds_size;
        let pattern = self
            .active_shape()
            .make_pattern(Rect::from_size(bounds));
        render_overlay(
            &pattern,
            &self.config.style,
            bounds,
            self.viewport.is_modifying(),
            self.config.device_pixel_scale,
        )
    }

    /// Rebuild the placement rect for the active shape in the current
    /// bounds and hand it to the viewport.
    fn apply_placement(&mut self) {
        let bounds = self.viewport.state().bounds_size;
        if bounds.is_empty() {
            return;
        }
        let placement = self
            .active_shape()
            .make_pattern(Rect::from_size(bounds))
            .preview_rect;
        self.viewport.set_placement(placement);
    }

    /// The pattern the cropper needs: placement inset by the border, the
    /// current pan offset as translation, and the point-to-source-pixel
    /// ratio divided by zoom as scale. The ratio uses the bitmap actually
    /// being cropped, so the transform holds regardless of which resolution
    /// variant is displayed.
    fn commit_pattern(&self) -> Option<CropPattern> {
        let image = self.image.as_ref()?;
        let state = *self.viewport.state();
        if state.bounds_size.is_empty() {
            return None;
        }
        let point_image = self.viewport.point_image_size()?;

        let mut pattern = self
            .active_shape()
            .make_pattern(Rect::from_size(state.bounds_size));
        pattern.preview_rect = pattern.preview_rect.inset(self.config.style.border_inset);
        pattern.translation = state.content_offset;
        pattern.scale = image.size().min_side() / point_image.min_side() / state.zoom_scale;
        pattern.mode = self.config.mode;
        Some(pattern)
    }

    /// Request the resolution variant matching the current display scale,
    /// unless that variant is already displayed or in flight.
    fn refresh_image(&mut self) {
        let scale = self.viewport.state().zoom_scale;
        let constraint = match best_constraint(&self.provider.constraints(), scale) {
            Some(constraint) => constraint,
            None => return,
        };
        if self.requested_constraint == Some(constraint) {
            return;
        }
        self.requested_constraint = Some(constraint);
        self.generation += 1;
        let generation = self.generation;
        debug!(
            "fetching variant {:?} for display scale {:.3} (generation {})",
            constraint, scale, generation
        );
        let inbox = Rc::clone(&self.inbox);
        self.provider.fetch(
            &constraint,
            Box::new(move |image| {
                inbox.borrow_mut().push((generation, image));
            }),
        );
    }

    /// Display a delivered bitmap. The first bind resets the viewport to
    /// first-load defaults; later binds are resolution variants of the same
    /// content and keep the pan/zoom state.
    fn bind_image(&mut self, bitmap: Bitmap) {
        if bitmap.is_empty() {
            warn!("provider delivered an empty bitmap; ignoring");
            return;
        }
        let first = self.image.is_none();
        self.viewport.set_image_size(Some(bitmap.size()));
        self.image = Some(bitmap);
        if first {
            if !self.viewport.state().bounds_size.is_empty() {
                self.viewport.reset();
                self.pending_reset = false;
            }
        } else {
            self.viewport.recompute(false);
        }
    }
}
