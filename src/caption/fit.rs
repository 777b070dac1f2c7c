//! Font-size search for caption lines.
//!
//! Starting at [`INITIAL_SIZE`], the size drops by [`SIZE_STEP`] until the
//! measured text fits inside the box. The step never changes, so the search
//! is bounded by [`MAX_ATTEMPTS`] measurements; running out of attempts (or
//! reaching size 0) is a [`CaptionError::FitFailure`].
//!
//! Measurement goes through the [`TextMeasure`] trait so the search can be
//! exercised with synthetic metrics; production uses
//! [`FontMeasure`](super::render::FontMeasure).

use super::CaptionError;
use tracing::{debug, trace};

pub const INITIAL_SIZE: u32 = 200;
pub const SIZE_STEP: u32 = 2;
pub const MAX_ATTEMPTS: u32 = 100;

/// Anything that can report the rendered extent of a line of text.
pub trait TextMeasure {
    /// Width and height, in pixels, of `text` drawn at font size `size`.
    fn measure(&self, text: &str, size: u32) -> (u32, u32);
}

/// The rectangle a caption line has to fit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitBox {
    pub width: u32,
    pub height: u32,
}

/// A caption line together with the size it fits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FittedText<'t> {
    /// The caption, unchanged.
    pub text: &'t str,
    pub size: u32,
    /// Measured extent at `size`.
    pub width: u32,
    pub height: u32,
    /// Number of measurements taken, including the one that fit.
    pub attempts: u32,
}

/// Find the largest size on the descent schedule at which `text` fits `bounds`.
pub fn fit_text<'t, M>(
    measure: &M,
    text: &'t str,
    bounds: FitBox,
    initial_size: u32,
) -> Result<FittedText<'t>, CaptionError>
where
    M: TextMeasure + ?Sized,
{
    let mut size = initial_size;
    let mut attempts = 0;

    while size > 0 && attempts < MAX_ATTEMPTS {
        attempts += 1;
        let (width, height) = measure.measure(text, size);
        if height > bounds.height || width > bounds.width {
            trace!(size, width, height, "caption too large");
            size = size.saturating_sub(SIZE_STEP);
            continue;
        }
        debug!(text, size, attempts, "caption fits");
        return Ok(FittedText {
            text,
            size,
            width,
            height,
            attempts,
        });
    }

    Err(CaptionError::FitFailure {
        text: text.to_string(),
    })
}
