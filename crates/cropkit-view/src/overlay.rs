//! Overlay rendering.
//!
//! Produces the RGBA layer a host composites over the zoomed image: the dim
//! wash outside the crop shape, the shape border, and the alignment grid
//! shown while a gesture is active. The shape and its stroke are squeezed
//! inward by the style's border inset so the stroke never bleeds past the
//! viewport edges, while the dim wash runs to the canvas edge. Everything is
//! multiplied by the device pixel scale so the raster is crisp on dense
//! displays.
//!
//! The renderer holds no state; everything is re-derived from the pattern
//! and style on each call. The style's backdrop color is host data (painted
//! behind the image, where this layer is painted in front) and is not
//! rendered here.

use cropkit_core::bitmap::Bitmap;
use cropkit_core::error::CropError;
use cropkit_core::geometry::{Rect, Size};
use cropkit_core::pattern::CropPattern;

use crate::style::OverlayStyle;

/// Render the overlay for one crop pattern.
///
/// # Arguments
///
/// * `pattern` - Active pattern; its placement rect positions the shape
/// * `style` - Colors, widths, insets, and grid configuration
/// * `bounds` - Viewport size in points
/// * `shows_grid_lines` - Whether a gesture is active
/// * `device_pixel_scale` - Physical pixels per point
///
/// # Returns
///
/// An RGBA bitmap of `bounds` scaled by `device_pixel_scale`, transparent
/// inside the crop shape.
pub fn render_overlay(
    pattern: &CropPattern,
    style: &OverlayStyle,
    bounds: Size,
    shows_grid_lines: bool,
    device_pixel_scale: f32,
) -> Result<Bitmap, CropError> {
    if bounds.is_empty() {
        return Err(CropError::DegenerateGeometry);
    }
    let width = (bounds.width * device_pixel_scale).ceil() as u32;
    let height = (bounds.height * device_pixel_scale).ceil() as u32;
    let mut canvas =
        tiny_skia::Pixmap::new(width, height).ok_or(CropError::AllocationFailed { width, height })?;

    // Squeeze the shape and its stroke inward by the border inset, then
    // scale to device pixels. Stroke widths ride this transform too.
    let inset_scale_x = (bounds.width - 2.0 * style.border_inset) / bounds.width;
    let inset_scale_y = (bounds.height - 2.0 * style.border_inset) / bounds.height;
    let transform = tiny_skia::Transform::from_scale(inset_scale_x, inset_scale_y)
        .pre_translate(style.border_inset, style.border_inset)
        .post_scale(device_pixel_scale, device_pixel_scale);

    let shape = pattern.path.materialized_in(pattern.preview_rect)?;

    // Everything outside the shape, even-odd. The outer rect is pre-grown
    // by the inverse of the inset squeeze so it maps back onto the full
    // canvas and the dim reaches the viewport edge.
    let outside = {
        let external = Rect::new(
            -style.border_inset,
            -style.border_inset,
            bounds.width / inset_scale_x,
            bounds.height / inset_scale_y,
        )
        .to_skia()
        .ok_or(CropError::DegenerateGeometry)?;
        let mut pb = tiny_skia::PathBuilder::new();
        pb.push_rect(external);
        append_path(&mut pb, &shape);
        let inverse = pb.finish().ok_or(CropError::PathConstruction)?;

        let mut mask = tiny_skia::Mask::new(width, height)
            .ok_or(CropError::AllocationFailed { width, height })?;
        mask.fill_path(&inverse, tiny_skia::FillRule::EvenOdd, true, transform);
        mask
    };

    fill_dim(&mut canvas, style, &outside)?;

    // Border: stroked at double width under the outside mask, so the inner
    // half of the line is clipped and the visible stroke hugs the shape
    // from the outside.
    if style.border_width > 0.0 {
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(style.border_color.to_skia());
        paint.anti_alias = true;
        let stroke = tiny_skia::Stroke {
            width: style.border_width * 2.0,
            ..tiny_skia::Stroke::default()
        };
        canvas.stroke_path(&shape, &paint, &stroke, transform, Some(&outside));
    }

    if shows_grid_lines && style.grid_line_count > 0 {
        draw_grid(&mut canvas, pattern, style, &shape, transform)?;
    }

    Ok(Bitmap::from_pixmap(&canvas))
}

/// Paint the dim wash through the outside mask, blurring the layer first
/// when the style asks for it.
fn fill_dim(
    canvas: &mut tiny_skia::Pixmap,
    style: &OverlayStyle,
    outside: &tiny_skia::Mask,
) -> Result<(), CropError> {
    let width = canvas.width();
    let height = canvas.height();
    let full = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
        .ok_or(CropError::DegenerateGeometry)?;
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(style.overlay_color.to_skia());

    if style.blur_radius > 0.0 {
        // Soften the dim edge: paint the masked wash into its own layer,
        // gaussian-blur it, and composite the result.
        let mut layer = tiny_skia::Pixmap::new(width, height)
            .ok_or(CropError::AllocationFailed { width, height })?;
        layer.fill_rect(full, &paint, tiny_skia::Transform::identity(), Some(outside));

        let source = Bitmap::from_pixmap(&layer)
            .to_rgba_image()
            .ok_or(CropError::AllocationFailed { width, height })?;
        let blurred = image::imageops::blur(&source, style.blur_radius);
        let layer = Bitmap::from_rgba_image(blurred).to_pixmap()?;
        canvas.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            tiny_skia::Transform::identity(),
            None,
        );
    } else {
        canvas.fill_rect(full, &paint, tiny_skia::Transform::identity(), Some(outside));
    }
    Ok(())
}

/// Evenly spaced alignment lines across the placement rect, clipped to the
/// inside of the shape.
fn draw_grid(
    canvas: &mut tiny_skia::Pixmap,
    pattern: &CropPattern,
    style: &OverlayStyle,
    shape: &tiny_skia::Path,
    transform: tiny_skia::Transform,
) -> Result<(), CropError> {
    let preview = pattern.preview_rect;
    let mut pb = tiny_skia::PathBuilder::new();
    for step in 1..=style.grid_line_count {
        let fraction = step as f32 / (style.grid_line_count + 1) as f32;
        let x = preview.min_x() + preview.width() * fraction;
        let y = preview.min_y() + preview.height() * fraction;
        pb.move_to(x, preview.min_y());
        pb.line_to(x, preview.max_y());
        pb.move_to(preview.min_x(), y);
        pb.line_to(preview.max_x(), y);
    }
    let lines = pb.finish().ok_or(CropError::PathConstruction)?;

    let mut inside = tiny_skia::Mask::new(canvas.width(), canvas.height()).ok_or(
        CropError::AllocationFailed {
            width: canvas.width(),
            height: canvas.height(),
        },
    )?;
    inside.fill_path(shape, tiny_skia::FillRule::Winding, true, transform);

    let mut paint = tiny_skia::Paint::default();
    paint.set_color(style.grid_line_color.to_skia());
    paint.anti_alias = true;
    let stroke = tiny_skia::Stroke {
        width: style.grid_line_width,
        ..tiny_skia::Stroke::default()
    };
    canvas.stroke_path(&lines, &paint, &stroke, transform, Some(&inside));
    Ok(())
}

fn append_path(pb: &mut tiny_skia::PathBuilder, path: &tiny_skia::Path) {
    for segment in path.segments() {
        match segment {
            tiny_skia::PathSegment::MoveTo(p) => pb.move_to(p.x, p.y),
            tiny_skia::PathSegment::LineTo(p) => pb.line_to(p.x, p.y),
            tiny_skia::PathSegment::QuadTo(p0, p1) => pb.quad_to(p0.x, p0.y, p1.x, p1.y),
            tiny_skia::PathSegment::CubicTo(p0, p1, p2) => {
                pb.cubic_to(p0.x, p0.y, p1.x, p1.y, p2.x, p2.y)
            }
            tiny_skia::PathSegment::Close => pb.close(),
        }
    }
}
