//! Shared test utilities for the memeify test suite.
//!
//! Synthetic images written to temp directories, plus a [`TextMeasure`] with
//! fixed metrics so the caption fitter can be tested without a font.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::cell::RefCell;
use std::path::Path;

use crate::caption::TextMeasure;

// =========================================================================
// Images
// =========================================================================

/// Opaque RGB gradient. Every pixel differs from its neighbours so
/// geometric transforms and inversions are visible.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

// =========================================================================
// Text measurement
// =========================================================================

/// Every glyph is `size / 2` wide and `size` tall. Records each size asked for.
#[derive(Default)]
pub struct FixedMeasure {
    sizes: RefCell<Vec<u32>>,
}

impl FixedMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes measured so far, in call order.
    pub fn sizes(&self) -> Vec<u32> {
        self.sizes.borrow().clone()
    }
}

impl TextMeasure for FixedMeasure {
    fn measure(&self, text: &str, size: u32) -> (u32, u32) {
        self.sizes.borrow_mut().push(size);
        (text.chars().count() as u32 * size / 2, size)
    }
}
