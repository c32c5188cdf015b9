//! Region extraction
//!
//! Maps a normalized selection rectangle onto absolute pixel bounds and
//! extracts the sub-raster. Out-of-range selections are clamped rather
//! than rejected, so the extracted region is always at least 1x1.

use crate::models::Selection;
use crate::raster::RasterImage;

/// Absolute pixel bounds of a selection. Half-open: `x2`/`y2` are
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x1: usize,
    pub y1: usize,
    pub x2: usize,
    pub y2: usize,
}

impl PixelRect {
    pub fn width(&self) -> usize {
        self.x2 - self.x1
    }

    pub fn height(&self) -> usize {
        self.y2 - self.y1
    }
}

/// Convert a normalized selection to clamped absolute pixel bounds.
///
/// Coordinates are truncated to integers, then clamped so that
/// `x1 < x2 <= width` and `y1 < y2 <= height`. There is no error path.
pub fn selection_bounds(selection: &Selection, width: u32, height: u32) -> PixelRect {
    let w = width as i64;
    let h = height as i64;

    let x1 = (selection.left * width as f32) as i64;
    let y1 = (selection.top * height as f32) as i64;
    let x2 = ((selection.left + selection.width) * width as f32) as i64;
    let y2 = ((selection.top + selection.height) * height as f32) as i64;

    let x1 = x1.clamp(0, w - 1);
    let y1 = y1.clamp(0, h - 1);
    let x2 = x2.min(w).max(x1 + 1);
    let y2 = y2.min(h).max(y1 + 1);

    PixelRect {
        x1: x1 as usize,
        y1: y1 as usize,
        x2: x2 as usize,
        y2: y2 as usize,
    }
}

/// Extract the selected area of an image as a new raster.
pub fn extract_region(image: &RasterImage, selection: &Selection) -> RasterImage {
    let rect = selection_bounds(selection, image.width, image.height);
    let mut region = RasterImage::new(rect.width() as u32, rect.height() as u32);

    let src_stride = image.width as usize * 3;
    let dst_stride = rect.width() * 3;
    for (dy, y) in (rect.y1..rect.y2).enumerate() {
        let src_start = y * src_stride + rect.x1 * 3;
        let dst_start = dy * dst_stride;
        region.data[dst_start..dst_start + dst_stride]
            .copy_from_slice(&image.data[src_start..src_start + dst_stride]);
    }
    region
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(left: f32, top: f32, width: f32, height: f32) -> Selection {
        Selection {
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn test_full_selection() {
        let rect = selection_bounds(&selection(0.0, 0.0, 1.0, 1.0), 640, 480);
        assert_eq!(rect, PixelRect { x1: 0, y1: 0, x2: 640, y2: 480 });
    }

    #[test]
    fn test_selection_is_clamped_not_rejected() {
        // left + width > 1 must clamp to the image edge.
        let rect = selection_bounds(&selection(0.8, 0.9, 0.5, 0.5), 100, 100);
        assert_eq!(rect.x1, 80);
        assert_eq!(rect.x2, 100);
        assert_eq!(rect.y1, 90);
        assert_eq!(rect.y2, 100);
    }

    #[test]
    fn test_degenerate_selection_yields_one_pixel() {
        let rect = selection_bounds(&selection(1.0, 1.0, 0.0, 0.0), 50, 50);
        assert_eq!(rect.width(), 1);
        assert_eq!(rect.height(), 1);
        assert!(rect.x2 <= 50 && rect.y2 <= 50);
    }

    #[test]
    fn test_bounds_always_within_image() {
        let cases = [
            selection(0.0, 0.0, 0.0, 0.0),
            selection(0.5, 0.5, 1.0, 1.0),
            selection(0.99, 0.01, 0.02, 0.98),
            selection(0.33, 0.66, 0.33, 0.33),
        ];
        for sel in cases {
            let rect = selection_bounds(&sel, 123, 77);
            assert!(rect.x1 < rect.x2 && rect.x2 <= 123);
            assert!(rect.y1 < rect.y2 && rect.y2 <= 77);
        }
    }

    #[test]
    fn test_extract_region_copies_pixels() {
        let mut image = RasterImage::new(4, 4);
        for (i, v) in image.data.iter_mut().enumerate() {
            *v = i as f32;
        }
        let region = extract_region(&image, &selection(0.5, 0.5, 0.5, 0.5));
        assert_eq!(region.width, 2);
        assert_eq!(region.height, 2);
        // Top-left of region is pixel (2, 2) of the source.
        assert_eq!(region.data[0], image.data[(2 * 4 + 2) * 3]);
    }
}
