//! Pure calculation functions for image dimensions and pixel values.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `source` to fit inside `bounds`, preserving aspect ratio.
///
/// The result touches at least one edge of the bounding box. Neither edge is
/// ever rounded down to zero.
///
/// # Examples
/// ```
/// # use memeify::imaging::calculations::fit_within;
/// // 400x300 into a 200x200 box → 200x150
/// assert_eq!(fit_within((400, 300), (200, 200)), (200, 150));
///
/// // 30x60 into a 1000x1000 box → 500x1000
/// assert_eq!(fit_within((30, 60), (1000, 1000)), (500, 1000));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    let scale = f64::min(
        max_w as f64 / src_w.max(1) as f64,
        max_h as f64 / src_h.max(1) as f64,
    );

    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Target dimensions for a "shrink only if larger" resize (`NxN>` geometry).
///
/// Returns `None` when the image already fits inside the square box.
pub fn shrink_to_fit(source: (u32, u32), bound: u32) -> Option<(u32, u32)> {
    let (w, h) = source;
    if w > bound || h > bound {
        Some(fit_within(source, (bound, bound)))
    } else {
        None
    }
}

/// Target dimensions for an "enlarge only if smaller" resize (`NxN<` geometry).
///
/// Both edges must be smaller than the box for the image to be enlarged.
pub fn enlarge_to_fit(source: (u32, u32), bound: u32) -> Option<(u32, u32)> {
    let (w, h) = source;
    if w < bound && h < bound {
        Some(fit_within(source, (bound, bound)))
    } else {
        None
    }
}

/// Halve both edges, never going below one pixel.
pub fn half_dimensions(source: (u32, u32)) -> (u32, u32) {
    ((source.0 / 2).max(1), (source.1 / 2).max(1))
}

/// Calculate preview dimensions: the longer edge becomes `size`, the shorter
/// edge is scaled proportionally and truncated.
///
/// ```
/// # use memeify::imaging::calculations::thumbnail_dimensions;
/// assert_eq!(thumbnail_dimensions((1000, 800), 500), (500, 400));
/// assert_eq!(thumbnail_dimensions((300, 900), 500), (166, 500));
/// ```
pub fn thumbnail_dimensions(source: (u32, u32), size: u32) -> (u32, u32) {
    let (w, h) = source;
    if h > w {
        let scaled = (w as f64 / h as f64 * size as f64) as u32;
        (scaled.max(1), size)
    } else {
        let scaled = (h as f64 / w.max(1) as f64 * size as f64) as u32;
        (size, scaled.max(1))
    }
}

/// Reduce a channel value to one of `levels` evenly spaced values.
///
/// `levels` below 2 are treated as 2 (pure black/white per channel).
pub fn posterize_channel(value: u8, levels: u32) -> u8 {
    let steps = (levels.max(2) - 1) as f32;
    let bucket = (value as f32 / 255.0 * steps).round();
    (bucket * 255.0 / steps).round() as u8
}
