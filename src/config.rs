//! Configuration module.
//!
//! Handles loading, validating, and merging `memeify.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `memeify.toml` in the working directory is picked up automatically;
//! `--config <FILE>` points at any other file.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [caption]
//! # font = "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf"
//! initial_size = 200        # First font size tried by the fitter
//! box_height = 200          # Height of the box each line must fit in
//! stroke_width = 3
//! stroke_color = [0, 0, 0]
//! fill_color = [255, 255, 255]
//! bottom_inset = 20         # Bottom baseline distance from the bottom edge
//!
//! [filters]
//! posterize_levels = 16
//! deep_fry_quality = 20     # JPEG quality (1-100)
//! shrink_box = 200
//! enlarge_box = 1000
//! implode_amount = 0.5
//! explode_amount = -1.0
//! swirl_degrees = 180.0
//! rotational_blur_angle = 10.0
//!
//! [preview]
//! thumbnail_size = 500      # Longer edge of preview thumbnails
//!
//! [export]
//! # directory = "/home/me/Pictures/memes"
//!
//! [ui]
//! theme = "DarkAmber"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::warp::MAX_BLUR_ANGLE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "memeify.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `memeify.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemeifyConfig {
    /// Caption font and drawing settings.
    pub caption: CaptionConfig,
    /// Per-filter parameters.
    pub filters: FiltersConfig,
    pub preview: PreviewConfig,
    /// Where exports are written.
    pub export: ExportConfig,
    pub ui: UiConfig,
}

impl MemeifyConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.caption.initial_size == 0 {
            return Err(ConfigError::Validation(
                "caption.initial_size must be non-zero".into(),
            ));
        }
        if self.caption.box_height == 0 {
            return Err(ConfigError::Validation(
                "caption.box_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.filters.deep_fry_quality) {
            return Err(ConfigError::Validation(
                "filters.deep_fry_quality must be 1-100".into(),
            ));
        }
        if !(2..=256).contains(&self.filters.posterize_levels) {
            return Err(ConfigError::Validation(
                "filters.posterize_levels must be 2-256".into(),
            ));
        }
        if self.filters.shrink_box == 0 || self.filters.enlarge_box == 0 {
            return Err(ConfigError::Validation(
                "filters.shrink_box and filters.enlarge_box must be non-zero".into(),
            ));
        }
        let angle = self.filters.rotational_blur_angle;
        if !angle.is_finite() || !(0.0..=MAX_BLUR_ANGLE).contains(&angle) {
            return Err(ConfigError::Validation(format!(
                "filters.rotational_blur_angle must be 0-{MAX_BLUR_ANGLE} degrees"
            )));
        }
        if self.preview.thumbnail_size == 0 {
            return Err(ConfigError::Validation(
                "preview.thumbnail_size must be non-zero".into(),
            ));
        }
        if self.ui.theme.trim().is_empty() {
            return Err(ConfigError::Validation("ui.theme must not be empty".into()));
        }
        Ok(())
    }
}

/// Caption font and drawing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// TrueType/OpenType font file. The bundled bold sans is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    pub initial_size: u32,
    pub box_height: u32,
    pub stroke_width: u32,
    pub stroke_color: [u8; 3],
    pub fill_color: [u8; 3],
    pub bottom_inset: u32,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font: None,
            initial_size: 200,
            box_height: 200,
            stroke_width: 3,
            stroke_color: [0, 0, 0],
            fill_color: [255, 255, 255],
            bottom_inset: 20,
        }
    }
}

/// Filter parameters. See [`FilterParams`](crate::imaging::FilterParams).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiltersConfig {
    pub posterize_levels: u32,
    pub deep_fry_quality: u32,
    pub shrink_box: u32,
    pub enlarge_box: u32,
    pub implode_amount: f32,
    pub explode_amount: f32,
    pub swirl_degrees: f32,
    pub rotational_blur_angle: f32,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            posterize_levels: 16,
            deep_fry_quality: 20,
            shrink_box: 200,
            enlarge_box: 1000,
            implode_amount: 0.5,
            explode_amount: -1.0,
            swirl_degrees: 180.0,
            rotational_blur_angle: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Longer edge, in pixels, of the thumbnails returned after each event.
    pub thumbnail_size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Overrides the platform's default output directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Front-end settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "DarkAmber".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(MemeifyConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `memeify.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    read_raw(&config_path).map(Some)
}

fn read_raw(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<MemeifyConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: MemeifyConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `memeify.toml` in `dir`, falling back to stock defaults.
pub fn load_config(dir: &Path) -> Result<MemeifyConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Load config from an explicit file. A missing file is an error here.
pub fn load_config_file(path: &Path) -> Result<MemeifyConfig, ConfigError> {
    resolve_config(stock_defaults_value(), Some(read_raw(path)?))
}

/// Returns a fully-commented stock `memeify.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# memeify Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# memeify reads ./memeify.toml when present, or the file given with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
[caption]
# TrueType/OpenType font file. Omit to use the bundled bold sans-serif.
# font = "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf"

# Font size the fitter starts from. It steps down by 2 until the line fits.
initial_size = 200

# Height of the box each caption line must fit in (width is the image width).
box_height = 200

# Outline drawn around the letters, in pixels.
stroke_width = 3
stroke_color = [0, 0, 0]
fill_color = [255, 255, 255]

# Distance from the bottom edge to the bottom caption's baseline.
bottom_inset = 20

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
[filters]
# Deep fry: shrink into shrink_box, posterize, JPEG at deep_fry_quality,
# then enlarge into enlarge_box.
posterize_levels = 16
deep_fry_quality = 20
shrink_box = 200
enlarge_box = 1000

# Radial displacement. Positive pulls toward the center, negative pushes out.
implode_amount = 0.5
explode_amount = -1.0

# Rotation at the center of the swirl, in degrees.
swirl_degrees = 180.0

# Total arc swept by the rotational blur, in degrees (0-360).
rotational_blur_angle = 10.0

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Longer edge of preview thumbnails, in pixels.
thumbnail_size = 500

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Output directory. Defaults to the platform pictures directory.
# directory = "/home/me/Pictures/memes"

# ---------------------------------------------------------------------------
# Front end
# ---------------------------------------------------------------------------
[ui]
theme = "DarkAmber"
"##
}
