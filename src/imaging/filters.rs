//! The filter menu.
//!
//! | Filter | Operation |
//! |---|---|
//! | deep fry | shrink to 200², posterize, JPEG q20 round trip, enlarge to 1000² |
//! | liquid rescale | seam-carve to half size (`imageproc::seam_carving`), enlarge to 1000² |
//! | implode / explode | radial displacement, amount 0.5 / −1.0 ([`warp`](super::warp)) |
//! | swirl | angular displacement, 180° ([`warp`](super::warp)) |
//! | invert | flatten alpha onto white, negate RGB |
//! | rotational blur | arc blur around the center, 10° ([`warp`](super::warp)) |
//!
//! Each filter is a pure function from one [`ImageBuffer`] to a new one. The
//! numbers above are the stock [`FilterParams`].

use super::buffer::{BufferError, ImageBuffer};
use super::calculations::{enlarge_to_fit, half_dimensions, posterize_channel, shrink_to_fit};
use super::params::{FilterParams, Quality};
use super::warp;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use imageproc::seam_carving::shrink_width;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum FilterError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// A filter name that is not on the menu.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter '{0}' (expected one of: deep fry, liquid rescale, implode, explode, swirl, invert, rotational blur)")]
pub struct UnknownFilter(pub String);

/// One entry of the filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    DeepFry,
    LiquidRescale,
    Implode,
    Explode,
    Swirl,
    Invert,
    RotationalBlur,
}

impl Filter {
    /// Menu order.
    pub const ALL: [Filter; 7] = [
        Filter::DeepFry,
        Filter::LiquidRescale,
        Filter::Implode,
        Filter::Explode,
        Filter::Swirl,
        Filter::Invert,
        Filter::RotationalBlur,
    ];

    /// Name shown in the filter selector.
    pub fn label(self) -> &'static str {
        match self {
            Filter::DeepFry => "deep fry",
            Filter::LiquidRescale => "liquid rescale",
            Filter::Implode => "implode",
            Filter::Explode => "explode",
            Filter::Swirl => "swirl",
            Filter::Invert => "invert",
            Filter::RotationalBlur => "rotational blur",
        }
    }

    /// Whether applying the filter twice gives back the input.
    pub fn is_involution(self) -> bool {
        matches!(self, Filter::Invert)
    }

    /// Decode, filter, re-encode.
    pub fn apply(
        self,
        buffer: &ImageBuffer,
        params: &FilterParams,
    ) -> Result<ImageBuffer, FilterError> {
        let image = buffer.decode()?;
        let filtered = self.apply_image(&image, params)?;
        info!(
            filter = self.label(),
            width = filtered.width(),
            height = filtered.height(),
            "applied filter"
        );
        Ok(ImageBuffer::encode(&filtered)?)
    }

    /// Filter an already decoded image.
    pub fn apply_image(
        self,
        image: &DynamicImage,
        params: &FilterParams,
    ) -> Result<DynamicImage, FilterError> {
        let result = match self {
            Filter::DeepFry => deep_fry(image, params)?,
            Filter::LiquidRescale => liquid_rescale(image, params),
            Filter::Implode => {
                DynamicImage::ImageRgba8(warp::implode(&image.to_rgba8(), params.implode_amount))
            }
            Filter::Explode => {
                DynamicImage::ImageRgba8(warp::implode(&image.to_rgba8(), params.explode_amount))
            }
            Filter::Swirl => {
                DynamicImage::ImageRgba8(warp::swirl(&image.to_rgba8(), params.swirl_degrees))
            }
            Filter::Invert => DynamicImage::ImageRgb8(invert(&image.to_rgba8())),
            Filter::RotationalBlur => DynamicImage::ImageRgba8(warp::rotational_blur(
                &image.to_rgba8(),
                params.rotational_blur_angle,
            )),
        };
        Ok(result)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the menu label in any case, with spaces, dashes or underscores
/// between words (`"deep fry"`, `"Deep-Fry"`, `"deep_fry"`).
impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '_' => ' ',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        Filter::ALL
            .into_iter()
            .find(|f| f.label() == normalized)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Enlarge-if-smaller step shared by the lossy filters.
fn enlarge(image: DynamicImage, bound: u32) -> DynamicImage {
    match enlarge_to_fit((image.width(), image.height()), bound) {
        Some((w, h)) => image.resize_exact(w, h, FilterType::Lanczos3),
        None => image,
    }
}

fn posterize(image: &mut RgbImage, levels: u32) {
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = posterize_channel(*channel, levels);
        }
    }
}

fn jpeg_roundtrip(image: &RgbImage, quality: Quality) -> Result<DynamicImage, BufferError> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.value() as u8);
    image.write_with_encoder(encoder).map_err(|e| BufferError::Encode {
        format: "JPEG",
        reason: e.to_string(),
    })?;
    debug!(bytes = bytes.len(), quality = quality.value(), "deep fry JPEG pass");
    image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).map_err(|e| {
        BufferError::Decode {
            source_name: "deep fry JPEG".to_string(),
            reason: e.to_string(),
        }
    })
}

/// Shrink, posterize, crush through a low-quality JPEG, blow back up.
fn deep_fry(image: &DynamicImage, params: &FilterParams) -> Result<DynamicImage, BufferError> {
    let small = match shrink_to_fit((image.width(), image.height()), params.shrink_box) {
        Some((w, h)) => image.resize_exact(w, h, FilterType::Lanczos3),
        None => image.clone(),
    };
    let mut rgb = small.to_rgb8();
    posterize(&mut rgb, params.posterize_levels);
    let fried = jpeg_roundtrip(&rgb, params.deep_fry_quality)?;
    Ok(enlarge(fried, params.enlarge_box))
}

/// Content-aware shrink to half width and half height.
///
/// Seam carving only removes vertical seams, so the height pass runs on the
/// image rotated a quarter turn.
fn liquid_rescale(image: &DynamicImage, params: &FilterParams) -> DynamicImage {
    let rgb = image.to_rgb8();
    let (target_w, target_h) = half_dimensions(rgb.dimensions());
    let narrowed = shrink_width(&rgb, target_w);
    let turned = image::imageops::rotate90(&narrowed);
    let flattened = shrink_width(&turned, target_h);
    let carved = image::imageops::rotate270(&flattened);
    enlarge(DynamicImage::ImageRgb8(carved), params.enlarge_box)
}

/// Composite onto white, dropping the alpha channel.
fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

fn invert(image: &RgbaImage) -> RgbImage {
    let mut flat = flatten_onto_white(image);
    image::imageops::invert(&mut flat);
    flat
}
