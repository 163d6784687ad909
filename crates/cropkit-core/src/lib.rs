//! Cropkit Core - Crop geometry and compositing library
//!
//! This crate provides the core cropping functionality for Cropkit,
//! including crop patterns and shapes, path-masked compositing, and
//! multi-resolution image providers.

pub mod bitmap;
pub mod cropper;
pub mod error;
pub mod geometry;
pub mod pattern;
pub mod provider;
pub mod shape;

pub use bitmap::Bitmap;
pub use cropper::{crop, crop_with_path, CropResult};
pub use error::CropError;
pub use geometry::{EdgeInsets, Point, Rect, Size};
pub use pattern::{CropMode, CropPattern, ShapeOption};
pub use provider::{
    best_constraint, FetchCallback, ImageProvider, ScaleConstraint, StaticImageProvider,
};
pub use shape::{AspectRatioPatternBuilder, PathKind, PatternBuilder, ShapeKind, ShapePath};
