//! Integration tests: drive a full cropping session through the controller
//! and check the committed pixels against regions extracted straight from
//! the source image.

use std::collections::HashMap;

use cropkit_core::bitmap::Bitmap;
use cropkit_core::cropper::CropResult;
use cropkit_core::geometry::{Point, Size};
use cropkit_core::pattern::{CropMode, ShapeOption};
use cropkit_core::provider::{ScaleConstraint, StaticImageProvider};
use cropkit_view::{Cropper, CropperConfig, GestureEvent};

/// Source image with a unique value per pixel position.
fn source_image(width: u32, height: u32) -> Bitmap {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[
                (x % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
                255,
            ]);
        }
    }
    Bitmap::new(width, height, pixels)
}

/// Extract a region of the source 1:1, the reference for crop comparisons.
fn extract_region(source: &Bitmap, x0: u32, y0: u32, width: u32, height: u32) -> Bitmap {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            pixels.extend_from_slice(&source.pixel(x, y).expect("region inside source"));
        }
    }
    Bitmap::new(width, height, pixels)
}

/// Per-pixel RMS distance over normalized channels.
fn rms_distance(a: &Bitmap, b: &Bitmap) -> f64 {
    assert_eq!((a.width, a.height), (b.width, b.height));
    let sum: f64 = a
        .pixels
        .iter()
        .zip(b.pixels.iter())
        .map(|(&pa, &pb)| {
            let d = (pa as f64 - pb as f64) / 255.0;
            d * d
        })
        .sum();
    (sum / a.pixels.len() as f64).sqrt()
}

fn config_without_inset(options: Vec<ShapeOption>, mode: CropMode) -> CropperConfig {
    let mut config = CropperConfig::default();
    config.shape_options = options;
    config.mode = mode;
    config.style.border_inset = 0.0;
    config
}

#[test]
fn commit_reproduces_source_region() {
    // 800x600 source behind an 800x600 viewport: the point grid matches the
    // pixel grid, so the commit transform is the identity apart from the
    // centering offset of the 287:269 placement.
    let source = source_image(800, 600);
    let provider = StaticImageProvider::single(source.clone());
    let config = config_without_inset(vec![ShapeOption::rect(287, 269)], CropMode::BoundingRect);

    let mut cropper = Cropper::new(config, Box::new(provider));
    cropper.handle(GestureEvent::BoundsChanged(Size::new(800.0, 600.0)));

    let state = cropper.viewport().state();
    assert!(
        (state.zoom_scale - 1.0).abs() < 1e-3,
        "a height-filling placement should rest at zoom 1, got {}",
        state.zoom_scale
    );

    let result = cropper.accept();
    let bitmap = match result {
        CropResult::Normal(bitmap) => bitmap,
        other => panic!("expected a settled crop, got {other:?}"),
    };

    // Placement: 600 * 287/269 wide, full height, centered. The committed
    // region starts at the aligned offset and covers the placement.
    assert_eq!((bitmap.width, bitmap.height), (641, 600));
    let reference = extract_region(&source, 80, 0, 641, 600);
    let rms = rms_distance(&bitmap, &reference);
    assert!(rms < 0.01, "crop deviates from the source region: rms {rms}");
}

#[test]
fn pan_and_zoom_shift_the_committed_region() {
    let source = source_image(600, 600);
    let provider = StaticImageProvider::single(source.clone());
    let config = config_without_inset(vec![ShapeOption::circle()], CropMode::Path);

    let mut cropper = Cropper::new(config, Box::new(provider));
    cropper.handle(GestureEvent::BoundsChanged(Size::new(300.0, 300.0)));

    // Zoom in to 2x and pan; at this zoom one screen point is one source
    // pixel (600px image across 300pt at zoom 2), so the region origin is
    // the raw content offset.
    cropper.handle(GestureEvent::ZoomBegan);
    cropper.handle(GestureEvent::ZoomChanged { zoom_scale: 2.0 });
    cropper.handle(GestureEvent::ZoomEnded);
    cropper.handle(GestureEvent::PanBegan);
    cropper.handle(GestureEvent::PanChanged {
        content_offset: Point::new(100.0, 50.0),
    });
    cropper.handle(GestureEvent::PanEnded);

    let bitmap = cropper
        .accept()
        .into_bitmap()
        .expect("settled session produces a crop");
    assert_eq!((bitmap.width, bitmap.height), (300, 300));

    // Center of the circle keeps the source pixel under it
    assert_eq!(bitmap.pixel(150, 150), source.pixel(250, 200));
    // Corners are outside the circular outline
    assert_eq!(bitmap.pixel(1, 1).map(|px| px[3]), Some(0));
    assert_eq!(bitmap.pixel(298, 298).map(|px| px[3]), Some(0));
}

#[test]
fn shape_switch_changes_the_committed_footprint() {
    let source = source_image(400, 400);
    let provider = StaticImageProvider::single(source);
    let config = config_without_inset(
        vec![ShapeOption::square(), ShapeOption::circle()],
        CropMode::Path,
    );

    let mut cropper = Cropper::new(config, Box::new(provider));
    cropper.handle(GestureEvent::BoundsChanged(Size::new(200.0, 200.0)));

    let square = cropper
        .accept()
        .into_bitmap()
        .expect("square crop");
    assert_ne!(
        square.pixel(1, 1).map(|px| px[3]),
        Some(0),
        "square corners are part of the crop"
    );

    cropper.handle(GestureEvent::ShapeSelected { index: 1 });
    let circle = cropper
        .accept()
        .into_bitmap()
        .expect("circle crop");
    assert_eq!(
        circle.pixel(1, 1).map(|px| px[3]),
        Some(0),
        "circle corners are clipped"
    );
    assert_eq!((square.width, square.height), (circle.width, circle.height));
}

#[test]
fn zoom_drives_variant_selection_end_to_end() {
    // Three variants of the same 2:1 content at different resolutions; the
    // placement matches the content aspect so the coverage minimum is 1
    let mut variants = HashMap::new();
    variants.insert(ScaleConstraint::LessThan(2.0), source_image(200, 100));
    variants.insert(ScaleConstraint::GreaterThan(3.0), source_image(800, 400));
    variants.insert(ScaleConstraint::Default, source_image(400, 200));
    let provider = StaticImageProvider::new(variants);

    let mut config = config_without_inset(vec![ShapeOption::rect(2, 1)], CropMode::BoundingRect);
    config.maximum_zoom = 10.0;

    let mut cropper = Cropper::new(config, Box::new(provider));
    cropper.handle(GestureEvent::BoundsChanged(Size::new(200.0, 200.0)));
    assert_eq!(
        cropper.image().map(|i| i.width),
        Some(200),
        "display scale 1 resolves to the low-resolution variant"
    );

    cropper.handle(GestureEvent::ZoomBegan);
    cropper.handle(GestureEvent::ZoomChanged { zoom_scale: 2.5 });
    assert_eq!(
        cropper.image().map(|i| i.width),
        Some(400),
        "2.5 satisfies neither bound and falls back to the default variant"
    );

    cropper.handle(GestureEvent::ZoomChanged { zoom_scale: 4.0 });
    cropper.handle(GestureEvent::ZoomEnded);
    assert_eq!(
        cropper.image().map(|i| i.width),
        Some(800),
        "deep zoom resolves to the high-resolution variant"
    );

    // At zoom 4 against the 800px variant one placement point is one source
    // pixel again, so the crop is an exact copy of the region under the
    // placement
    let bitmap = cropper
        .accept()
        .into_bitmap()
        .expect("crop against the high-resolution variant");
    assert_eq!((bitmap.width, bitmap.height), (200, 100));
    let reference = extract_region(&source_image(800, 400), 0, 0, 200, 100);
    assert_eq!(bitmap.pixels, reference.pixels);
}

#[test]
fn overlay_matches_interaction_phase() {
    let provider = StaticImageProvider::single(source_image(400, 400));
    let config = config_without_inset(vec![ShapeOption::circle()], CropMode::Path);

    let mut cropper = Cropper::new(config, Box::new(provider));
    cropper.handle(GestureEvent::BoundsChanged(Size::new(100.0, 100.0)));

    let idle = cropper.overlay_frame().expect("idle overlay");
    assert_eq!((idle.width, idle.height), (100, 100));
    // Dimmed outside the circle, clear inside
    assert_eq!(idle.pixel(1, 1).map(|px| px[3]), Some(128));
    assert_eq!(idle.pixel(50, 50).map(|px| px[3]), Some(0));

    // Mid-gesture the commit weakens to Forced and the grid appears
    cropper.handle(GestureEvent::ZoomBegan);
    cropper.handle(GestureEvent::ZoomChanged { zoom_scale: 1.5 });
    assert!(cropper.make_crop_result().is_forced());
    let active = cropper.overlay_frame().expect("active overlay");
    let grid_x = (100.0_f32 / 3.0).round() as u32;
    let grid_alpha = active.pixel(grid_x, 50).map(|px| px[3]).unwrap_or(0);
    assert!(
        grid_alpha > 0,
        "grid line expected during an active gesture, alpha {grid_alpha}"
    );

    cropper.handle(GestureEvent::ZoomEnded);
    assert!(!cropper.make_crop_result().is_forced());
}
