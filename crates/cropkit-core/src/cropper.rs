//! Crop compositing.
//!
//! A crop is driven by a [`CropPattern`]: the pattern's outline is
//! materialized at its preview size, re-anchored at the origin, moved by the
//! pattern translation and multiplied by the pattern scale, in that order.
//! The translation applies before the scale so that a pan offset captured in
//! viewport point space lands correctly once mapped into image pixel space.
//! The output bitmap is sized to the transformed outline's bounding box.
//!
//! Cropping outside the source image is permitted: the region beyond the
//! source stays transparent. Callers that want edge clamping must constrain
//! their patterns instead.

use crate::bitmap::Bitmap;
use crate::error::CropError;
use crate::pattern::{CropMode, CropPattern};

/// Outcome of a crop request.
#[derive(Debug, Clone, PartialEq)]
pub enum CropResult {
    /// No image was bound, or the pattern could not produce a crop.
    Undefined,
    /// A crop taken from a settled viewport.
    Normal(Bitmap),
    /// A crop taken while the viewport was still mid-interaction.
    Forced(Bitmap),
}

impl CropResult {
    /// The cropped bitmap, if one was produced.
    pub fn bitmap(&self) -> Option<&Bitmap> {
        match self {
            CropResult::Undefined => None,
            CropResult::Normal(bitmap) | CropResult::Forced(bitmap) => Some(bitmap),
        }
    }

    /// Consume the result, keeping only the bitmap.
    pub fn into_bitmap(self) -> Option<Bitmap> {
        match self {
            CropResult::Undefined => None,
            CropResult::Normal(bitmap) | CropResult::Forced(bitmap) => Some(bitmap),
        }
    }

    /// Whether the crop was taken mid-interaction.
    pub fn is_forced(&self) -> bool {
        matches!(self, CropResult::Forced(_))
    }
}

/// Pixel region covered by a transformed outline: the bounding-box origin
/// rounded to the nearest pixel and the size rounded up. This is the only
/// rounding in the crop pipeline.
#[derive(Debug, Clone, Copy)]
struct PixelRegion {
    x: i64,
    y: i64,
    width: u32,
    height: u32,
}

/// Crop an image with a placed pattern.
///
/// # Arguments
///
/// * `image` - Source bitmap to crop
/// * `pattern` - Placement, outline, and the commit-time translation/scale
///
/// # Returns
///
/// A new bitmap sized to the transformed outline's bounding box. Fails with
/// `DegenerateGeometry` when that box (or the pattern's preview rect) has no
/// area, and `EmptyImage` when the source has no pixels.
pub fn crop(image: &Bitmap, pattern: &CropPattern) -> Result<Bitmap, CropError> {
    if image.is_empty() {
        return Err(CropError::EmptyImage);
    }

    let materialized = pattern.path.materialized(pattern.preview_rect.size)?;
    let footprint = materialized.bounds();
    let commit = tiny_skia::Transform::from_translate(pattern.translation.x, pattern.translation.y)
        .post_scale(pattern.scale, pattern.scale);

    match pattern.mode {
        CropMode::BoundingRect => {
            // The silhouette is ignored: crop the footprint, re-anchored at
            // the origin. The mask would be the full rectangle, so a plain
            // pixel copy suffices.
            let rect = tiny_skia::Rect::from_xywh(0.0, 0.0, footprint.width(), footprint.height())
                .ok_or(CropError::DegenerateGeometry)?;
            let mut pb = tiny_skia::PathBuilder::new();
            pb.push_rect(rect);
            let path = pb
                .finish()
                .ok_or(CropError::PathConstruction)?
                .transform(commit)
                .ok_or(CropError::PathConstruction)?;
            Ok(copy_region(image, region_of(&path)?))
        }
        CropMode::Path => {
            let anchored = materialized
                .transform(tiny_skia::Transform::from_translate(
                    -footprint.x(),
                    -footprint.y(),
                ))
                .ok_or(CropError::PathConstruction)?;
            let path = anchored
                .transform(commit)
                .ok_or(CropError::PathConstruction)?;
            crop_with_path(image, &path)
        }
    }
}

/// Crop an image with an already-transformed outline in image pixel space.
///
/// The outline's silhouette is always honored; pixels it does not cover come
/// out transparent. [`crop`] delegates here for exact-path patterns.
pub fn crop_with_path(image: &Bitmap, path: &tiny_skia::Path) -> Result<Bitmap, CropError> {
    if image.is_empty() {
        return Err(CropError::EmptyImage);
    }
    let region = region_of(path)?;
    let mut output = copy_region(image, region);
    apply_path_mask(&mut output, path, region)?;
    Ok(output)
}

fn region_of(path: &tiny_skia::Path) -> Result<PixelRegion, CropError> {
    let bounds = path.bounds();
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(CropError::DegenerateGeometry);
    }
    Ok(PixelRegion {
        x: bounds.x().round() as i64,
        y: bounds.y().round() as i64,
        width: bounds.width().ceil() as u32,
        height: bounds.height().ceil() as u32,
    })
}

/// Copy the region out of the source 1:1, without resampling. Rows and
/// columns outside the source stay transparent.
fn copy_region(image: &Bitmap, region: PixelRegion) -> Bitmap {
    let mut pixels = vec![0u8; region.width as usize * region.height as usize * 4];
    let src_w = image.width as i64;
    let src_h = image.height as i64;

    for row in 0..region.height as i64 {
        let src_y = region.y + row;
        if src_y < 0 || src_y >= src_h {
            continue;
        }
        let first_col = (-region.x).max(0);
        let last_col = (src_w - region.x).min(region.width as i64);
        if first_col >= last_col {
            continue;
        }
        let span = ((last_col - first_col) * 4) as usize;
        let src_start = ((src_y * src_w + region.x + first_col) * 4) as usize;
        let dst_start = ((row * region.width as i64 + first_col) * 4) as usize;
        pixels[dst_start..dst_start + span]
            .copy_from_slice(&image.pixels[src_start..src_start + span]);
    }

    Bitmap::new(region.width, region.height, pixels)
}

/// Cut the outline's silhouette into the output.
///
/// The outline is rasterized anti-aliased with its bounding box aligned to
/// the output origin, and the coverage is multiplied into all four channels,
/// so clipped-away pixels come out as transparent black rather than keeping
/// their source color under a zero alpha.
fn apply_path_mask(
    output: &mut Bitmap,
    path: &tiny_skia::Path,
    region: PixelRegion,
) -> Result<(), CropError> {
    let mut pixmap = tiny_skia::Pixmap::new(output.width, output.height).ok_or(
        CropError::AllocationFailed {
            width: output.width,
            height: output.height,
        },
    )?;
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    pixmap.fill_path(
        path,
        &paint,
        tiny_skia::FillRule::Winding,
        tiny_skia::Transform::from_translate(-(region.x as f32), -(region.y as f32)),
        None,
    );

    for (pixel, mask_px) in output
        .pixels
        .chunks_exact_mut(4)
        .zip(pixmap.data().chunks_exact(4))
    {
        let coverage = mask_px[3] as u16;
        for channel in pixel {
            *channel = ((*channel as u16 * coverage) / 255) as u8;
        }
    }
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================
