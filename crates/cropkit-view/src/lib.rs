//! Cropkit View - Interactive cropping layer
//!
//! This crate provides the stateful side of Cropkit: the pan/zoom viewport
//! engine, the overlay renderer, and the controller that wires gestures,
//! shape selection, and multi-resolution image fetching into crop results.

pub mod config;
pub mod controller;
pub mod event;
pub mod overlay;
pub mod style;
pub mod viewport;

pub use config::CropperConfig;
pub use controller::Cropper;
pub use event::GestureEvent;
pub use overlay::render_overlay;
pub use style::{OverlayStyle, Rgba};
pub use viewport::{ContentLayout, Phase, Viewport, ViewportState};
