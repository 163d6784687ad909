//! RGBA bitmap storage and raster interop.

use crate::error::CropError;
use crate::geometry::Size;

/// An image with RGBA pixel data.
///
/// Alpha is carried through the whole pipeline: a crop region reaching past
/// the source image produces transparent pixels instead of clamping to the
/// nearest edge, and shape masks cut transparency into the result.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 4) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap filled with a single RGBA color.
    pub fn from_fill(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Bitmap from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// The pixel dimensions as a float size.
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    /// The RGBA value at (x, y), or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Convert to a premultiplied tiny-skia pixmap for compositing.
    pub fn to_pixmap(&self) -> Result<tiny_skia::Pixmap, CropError> {
        let mut pixmap =
            tiny_skia::Pixmap::new(self.width, self.height).ok_or(CropError::AllocationFailed {
                width: self.width,
                height: self.height,
            })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(self.pixels.chunks_exact(4)) {
            *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(pixmap)
    }

    /// Convert from a premultiplied pixmap, demultiplying the alpha back out.
    pub fn from_pixmap(pixmap: &tiny_skia::Pixmap) -> Self {
        let mut pixels = Vec::with_capacity((pixmap.width() * pixmap.height() * 4) as usize);
        for px in pixmap.pixels() {
            let c = px.demultiply();
            pixels.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_creation() {
        let pixels = vec![0u8; 100 * 50 * 4];
        let bitmap = Bitmap::new(100, 50, pixels);

        assert_eq!(bitmap.width, 100);
        assert_eq!(bitmap.height, 50);
        assert_eq!(bitmap.pixel_count(), 5000);
        assert_eq!(bitmap.byte_size(), 20000);
        assert!(!bitmap.is_empty());
    }

    #[test]
    fn test_bitmap_empty() {
        let bitmap = Bitmap::new(0, 0, vec![]);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_bitmap_from_fill() {
        let bitmap = Bitmap::from_fill(4, 2, [10, 20, 30, 255]);
        assert_eq!(bitmap.byte_size(), 4 * 2 * 4);
        assert_eq!(bitmap.pixel(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(bitmap.pixel(3, 1), Some([10, 20, 30, 255]));
        assert_eq!(bitmap.pixel(4, 0), None);
        assert_eq!(bitmap.pixel(0, 2), None);
    }

    #[test]
    fn test_rgba_image_roundtrip() {
        let bitmap = Bitmap::from_fill(8, 8, [1, 2, 3, 4]);
        let img = bitmap.to_rgba_image().unwrap();
        assert_eq!(img.dimensions(), (8, 8));

        let back = Bitmap::from_rgba_image(img);
        assert_eq!(back, bitmap);
    }

    #[test]
    fn test_pixmap_roundtrip_opaque() {
        // Opaque pixels survive the premultiply/demultiply pair exactly.
        let mut bitmap = Bitmap::from_fill(2, 2, [200, 100, 50, 255]);
        bitmap.pixels[0..4].copy_from_slice(&[8, 16, 32, 255]);

        let pixmap = bitmap.to_pixmap().unwrap();
        let back = Bitmap::from_pixmap(&pixmap);
        assert_eq!(back, bitmap);
    }

    #[test]
    fn test_pixmap_transparent_stays_transparent() {
        let bitmap = Bitmap::from_fill(2, 2, [0, 0, 0, 0]);
        let pixmap = bitmap.to_pixmap().unwrap();
        let back = Bitmap::from_pixmap(&pixmap);
        assert_eq!(back.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_to_pixmap_rejects_zero_size() {
        let bitmap = Bitmap::new(0, 0, vec![]);
        assert!(matches!(
            bitmap.to_pixmap(),
            Err(CropError::AllocationFailed { .. })
        ));
    }
}
