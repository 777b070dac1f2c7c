//! Radial and angular pixel displacement.
//!
//! Implode/explode and swirl are inverse mappings handed to
//! [`imageproc::geometric_transformations::warp_with`]: for every output
//! pixel the mapping returns the source coordinate to sample. Both only
//! touch pixels inside the ellipse inscribed in the image; everything outside
//! maps to itself.
//!
//! Rotational blur averages samples taken along an arc around the image
//! center.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, warp_with};
use std::f32::consts::PI;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Bilinear sampling reads the pixel right of and below the source point, so
/// sources stay this far inside the last row and column.
const EDGE_MARGIN: f32 = 0.01;

/// Widest arc rotational blur sweeps; wider requests are clamped to it.
pub const MAX_BLUR_ANGLE: f32 = 360.0;

/// Center, radius and aspect correction for the displacement effects.
///
/// Non-square images are stretched along their shorter axis so the affected
/// region is the inscribed ellipse rather than a circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpGeometry {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl WarpGeometry {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let center_x = 0.5 * w;
        let center_y = 0.5 * h;
        let (radius, scale_x, scale_y) = if width > height {
            (center_x, 1.0, w / h)
        } else if width < height {
            (center_y, h / w, 1.0)
        } else {
            (center_x, 1.0, 1.0)
        };
        Self {
            center_x,
            center_y,
            radius,
            scale_x,
            scale_y,
        }
    }

    /// Offset from center in aspect-corrected space, with its squared length.
    fn delta(&self, x: f32, y: f32) -> (f32, f32, f32) {
        let dx = self.scale_x * (x - self.center_x);
        let dy = self.scale_y * (y - self.center_y);
        (dx, dy, dx * dx + dy * dy)
    }

    fn to_source(&self, dx: f32, dy: f32) -> (f32, f32) {
        (
            dx / self.scale_x + self.center_x,
            dy / self.scale_y + self.center_y,
        )
    }
}

/// Source coordinate for implode. Positive `amount` pulls pixels toward the
/// center, negative pushes them out (explode).
pub fn implode_source(geometry: &WarpGeometry, amount: f32, x: f32, y: f32) -> (f32, f32) {
    let (dx, dy, distance) = geometry.delta(x, y);
    if distance >= geometry.radius * geometry.radius {
        return (x, y);
    }
    let factor = if distance > 0.0 {
        (PI * distance.sqrt() / geometry.radius / 2.0)
            .sin()
            .powf(-amount)
    } else {
        1.0
    };
    geometry.to_source(factor * dx, factor * dy)
}

/// Source coordinate for swirl. The rotation is strongest at the center and
/// falls off quadratically to zero at the radius.
pub fn swirl_source(geometry: &WarpGeometry, radians: f32, x: f32, y: f32) -> (f32, f32) {
    let (dx, dy, distance) = geometry.delta(x, y);
    if distance >= geometry.radius * geometry.radius {
        return (x, y);
    }
    let falloff = 1.0 - distance.sqrt() / geometry.radius;
    let (sine, cosine) = (radians * falloff * falloff).sin_cos();
    geometry.to_source(cosine * dx - sine * dy, sine * dx + cosine * dy)
}

/// Keep a source coordinate where bilinear sampling has all four neighbors.
fn clamp_source((x, y): (f32, f32), width: u32, height: u32) -> (f32, f32) {
    (
        x.clamp(0.0, (width - 1) as f32 - EDGE_MARGIN),
        y.clamp(0.0, (height - 1) as f32 - EDGE_MARGIN),
    )
}

/// Run an inverse mapping over the image. Images one pixel wide or tall have
/// nothing to displace and come back unchanged.
fn warp<F>(image: &RgbaImage, mapping: F) -> RgbaImage
where
    F: Fn(f32, f32) -> (f32, f32) + Sync + Send,
{
    let (width, height) = image.dimensions();
    if width < 2 || height < 2 {
        return image.clone();
    }
    let opaque = image.pixels().all(|p| p[3] == u8::MAX);
    let mut warped = warp_with(
        image,
        move |x, y| clamp_source(mapping(x, y), width, height),
        Interpolation::Bilinear,
        TRANSPARENT,
    );
    // Blending truncates, so a full alpha can come out as 254.
    if opaque {
        for pixel in warped.pixels_mut() {
            pixel[3] = u8::MAX;
        }
    }
    warped
}

pub fn implode(image: &RgbaImage, amount: f32) -> RgbaImage {
    let geometry = WarpGeometry::for_dimensions(image.width(), image.height());
    warp(image, move |x, y| implode_source(&geometry, amount, x, y))
}

pub fn swirl(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let geometry = WarpGeometry::for_dimensions(image.width(), image.height());
    let radians = degrees.to_radians();
    warp(image, move |x, y| swirl_source(&geometry, radians, x, y))
}

/// Evenly spaced sample angles (radians) covering `angle_degrees`, centered on zero.
///
/// One sample per half degree of arc, always odd so zero is included. The arc
/// is capped at [`MAX_BLUR_ANGLE`]; NaN counts as no blur.
pub fn blur_angles(angle_degrees: f32) -> Vec<f32> {
    let span = angle_degrees.abs();
    if span.is_nan() || span == 0.0 {
        return vec![0.0];
    }
    let span = span.min(MAX_BLUR_ANGLE);
    let samples = (span.ceil() as usize) * 2 + 1;
    let step = span / (samples - 1) as f32;
    (0..samples)
        .map(|i| (-span / 2.0 + i as f32 * step).to_radians())
        .collect()
}

/// Blur along circles around the image center, sweeping `angle_degrees` in total.
///
/// Samples falling outside the image are clamped to the nearest edge pixel.
pub fn rotational_blur(image: &RgbaImage, angle_degrees: f32) -> RgbaImage {
    let angles = blur_angles(angle_degrees);
    if angles.len() == 1 {
        return image.clone();
    }

    let rotations: Vec<(f32, f32)> = angles.iter().map(|a| a.sin_cos()).collect();
    let (width, height) = image.dimensions();
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let max_x = width.saturating_sub(1) as f32;
    let max_y = height.saturating_sub(1) as f32;
    let count = rotations.len() as u32;

    RgbaImage::from_fn(width, height, |x, y| {
        let dx = x as f32 + 0.5 - center_x;
        let dy = y as f32 + 0.5 - center_y;
        let mut sums = [0u32; 4];
        for &(sine, cosine) in &rotations {
            let sx = (cosine * dx - sine * dy + center_x - 0.5).round().clamp(0.0, max_x);
            let sy = (sine * dx + cosine * dy + center_y - 0.5).round().clamp(0.0, max_y);
            let pixel = image.get_pixel(sx as u32, sy as u32);
            for (sum, channel) in sums.iter_mut().zip(pixel.0) {
                *sum += channel as u32;
            }
        }
        Rgba(sums.map(|s| ((s + count / 2) / count) as u8))
    })
}
