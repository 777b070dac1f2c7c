//! Parameter types for filter operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`config`](crate::config) layer (which the user edits) and the
//! [`filters`](super::filters) module (which does the pixel work), so filter
//! code never reads TOML and config code never touches pixels.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1-100), clamped on construction.
//! - [`FilterParams`]: every knob the seven filters read, with the stock values as defaults.

use crate::config::FiltersConfig;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Fixed parameters the filters are invoked with.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Levels per channel for the deep-fry posterize step.
    pub posterize_levels: u32,
    /// JPEG quality of the deep-fry re-encode.
    pub deep_fry_quality: Quality,
    /// Deep fry shrinks anything larger than this square before frying.
    pub shrink_box: u32,
    /// Results smaller than this square are scaled back up.
    pub enlarge_box: u32,
    pub implode_amount: f32,
    pub explode_amount: f32,
    pub swirl_degrees: f32,
    /// Total arc, in degrees, swept by the rotational blur.
    pub rotational_blur_angle: f32,
}

impl FilterParams {
    /// Build filter parameters from the `[filters]` config section.
    pub fn from_config(config: &FiltersConfig) -> Self {
        Self {
            posterize_levels: config.posterize_levels,
            deep_fry_quality: Quality::new(config.deep_fry_quality),
            shrink_box: config.shrink_box,
            enlarge_box: config.enlarge_box,
            implode_amount: config.implode_amount,
            explode_amount: config.explode_amount,
            swirl_degrees: config.swirl_degrees,
            rotational_blur_angle: config.rotational_blur_angle,
        }
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::from_config(&FiltersConfig::default())
    }
}
