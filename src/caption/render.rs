//! Drawing fitted caption lines onto an image.
//!
//! Text is measured and rasterized with `ab_glyph` through
//! `imageproc::drawing`. The outline is produced by drawing the line in the
//! stroke color at every offset within `stroke_width` of the origin, then
//! drawing it once more in the fill color on top.

use super::fit::{FitBox, FittedText, TextMeasure, fit_text};
use super::{CaptionError, Captions};
use crate::config::CaptionConfig;
use crate::imaging::ImageBuffer;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use tracing::debug;

/// Bold sans-serif bundled into the binary, used unless a font file is configured.
static DEFAULT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Visual settings for caption rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub initial_size: u32,
    pub box_height: u32,
    pub stroke_width: u32,
    pub stroke_color: Rgba<u8>,
    pub fill_color: Rgba<u8>,
    /// Distance from the bottom edge to the bottom caption's baseline.
    pub bottom_inset: u32,
}

impl CaptionStyle {
    pub fn from_config(config: &CaptionConfig) -> Self {
        let [r, g, b] = config.stroke_color;
        let [fr, fg, fb] = config.fill_color;
        Self {
            initial_size: config.initial_size,
            box_height: config.box_height,
            stroke_width: config.stroke_width,
            stroke_color: Rgba([r, g, b, 255]),
            fill_color: Rgba([fr, fg, fb, 255]),
            bottom_inset: config.bottom_inset,
        }
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self::from_config(&CaptionConfig::default())
    }
}

/// [`TextMeasure`] backed by a real font.
pub struct FontMeasure<'f> {
    font: &'f FontArc,
}

impl<'f> FontMeasure<'f> {
    pub fn new(font: &'f FontArc) -> Self {
        Self { font }
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn measure(&self, text: &str, size: u32) -> (u32, u32) {
        text_size(PxScale::from(size as f32), self.font, text)
    }
}

/// Every pixel offset within `width` of the origin, excluding the origin.
pub fn stroke_offsets(width: u32) -> Vec<(i32, i32)> {
    let r = width as i32;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx, dy) != (0, 0) && dx * dx + dy * dy <= r * r {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// Top-left drawing origin for a line centered on `center_x` whose baseline
/// sits at `baseline`.
pub fn text_origin(center_x: u32, baseline: i32, text_width: u32, ascent: f32) -> (i32, i32) {
    (
        center_x as i32 - (text_width / 2) as i32,
        baseline - ascent.round() as i32,
    )
}

/// The top caption hangs from the top edge: its baseline is one font size down.
pub fn top_baseline(size: u32) -> i32 {
    size as i32
}

pub fn bottom_baseline(image_height: u32, inset: u32) -> i32 {
    image_height as i32 - inset as i32
}

/// Fits and draws captions with one font and style.
#[derive(Clone)]
pub struct Captioner {
    font: FontArc,
    style: CaptionStyle,
}

impl Captioner {
    pub fn new(font: FontArc, style: CaptionStyle) -> Self {
        Self { font, style }
    }

    /// Captioner using the bundled font.
    pub fn with_default_font(style: CaptionStyle) -> Self {
        Self::new(default_font(), style)
    }

    /// Build from the `[caption]` config section, loading the font file if one is set.
    pub fn from_config(config: &CaptionConfig) -> Result<Self, CaptionError> {
        let font = match &config.font {
            Some(path) => load_font(path)?,
            None => default_font(),
        };
        Ok(Self::new(font, CaptionStyle::from_config(config)))
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Caption an encoded buffer, returning a new one.
    pub fn caption(
        &self,
        buffer: &ImageBuffer,
        captions: &Captions,
    ) -> Result<ImageBuffer, CaptionError> {
        let image = buffer.decode()?;
        let captioned = self.caption_image(&image, captions)?;
        Ok(ImageBuffer::encode(&DynamicImage::ImageRgba8(captioned))?)
    }

    /// Caption a decoded image.
    pub fn caption_image(
        &self,
        image: &DynamicImage,
        captions: &Captions,
    ) -> Result<RgbaImage, CaptionError> {
        let mut canvas = image.to_rgba8();
        let (width, height) = canvas.dimensions();
        let bounds = FitBox {
            width,
            height: self.style.box_height,
        };
        let measure = FontMeasure::new(&self.font);

        let mut lines = Vec::with_capacity(2);
        if !captions.top.is_empty() {
            let fit = fit_text(&measure, &captions.top, bounds, self.style.initial_size)?;
            lines.push((fit, top_baseline(fit.size)));
        }
        if !captions.bottom.is_empty() {
            let fit = fit_text(&measure, &captions.bottom, bounds, self.style.initial_size)?;
            lines.push((fit, bottom_baseline(height, self.style.bottom_inset)));
        }

        for (line, baseline) in &lines {
            self.draw_line(&mut canvas, line, *baseline);
        }
        Ok(canvas)
    }

    fn draw_line(&self, canvas: &mut RgbaImage, line: &FittedText<'_>, baseline: i32) {
        let scale = PxScale::from(line.size as f32);
        let ascent = self.font.as_scaled(scale).ascent();
        let (x, y) = text_origin(canvas.width() / 2, baseline, line.width, ascent);
        debug!(text = line.text, size = line.size, x, y, "drawing caption");

        for (dx, dy) in stroke_offsets(self.style.stroke_width) {
            draw_text_mut(
                canvas,
                self.style.stroke_color,
                x + dx,
                y + dy,
                scale,
                &self.font,
                line.text,
            );
        }
        draw_text_mut(
            canvas,
            self.style.fill_color,
            x,
            y,
            scale,
            &self.font,
            line.text,
        );
    }
}

pub fn default_font() -> FontArc {
    FontArc::try_from_slice(DEFAULT_FONT).expect("bundled font must parse")
}

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontArc, CaptionError> {
    let data = std::fs::read(path).map_err(|source| CaptionError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(data)
        .map_err(|e| CaptionError::InvalidFont(format!("{}: {e}", path.display())))
}
