//! Top/bottom captions in the classic outlined meme style.
//!
//! Each non-empty line is fitted into a box as wide as the image and
//! [`box_height`](crate::config::CaptionConfig::box_height) tall using the
//! fixed descent schedule in [`fit`], then drawn centered with a dark stroke
//! under a light fill ([`render`]). Every line is fitted before any pixel is
//! touched, so a [`CaptionError::FitFailure`] never leaves half a caption
//! behind.

pub mod fit;
pub mod render;

pub use fit::{FitBox, FittedText, TextMeasure, fit_text};
pub use render::{CaptionStyle, Captioner, FontMeasure};

use crate::imaging::BufferError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Unable to fit caption text: {text}")]
    FitFailure { text: String },
    #[error("Failed to read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid font data: {0}")]
    InvalidFont(String),
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl CaptionError {
    pub fn is_fit_failure(&self) -> bool {
        matches!(self, CaptionError::FitFailure { .. })
    }
}

/// Top and bottom caption text. An empty line is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions {
    pub top: String,
    pub bottom: String,
}

impl Captions {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty()
    }
}
