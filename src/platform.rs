//! Where exports go and what they are called.
//!
//! Each platform answers one question, "what is the default output
//! directory?", through [`OutputDirectory`]. [`platform_default`] picks the
//! implementation with `cfg(target_os)`; every implementation falls back to
//! the current directory when the lookup fails.
//!
//! | Platform | Directory |
//! |---|---|
//! | Linux | XDG pictures directory (`dirs::picture_dir`) |
//! | Windows | `~\Pictures` |
//! | other | current directory |

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Prefix of every exported file name.
pub const EXPORT_PREFIX: &str = "memeify-";
/// `strftime` pattern for the timestamp part of an export name.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// The "default output directory" capability.
pub trait OutputDirectory {
    fn default_output_dir(&self) -> PathBuf;
}

/// XDG pictures directory, e.g. `~/Pictures`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XdgPictures;

impl OutputDirectory for XdgPictures {
    fn default_output_dir(&self) -> PathBuf {
        dirs::picture_dir().unwrap_or_else(current_dir)
    }
}

/// `Pictures` under the user's home directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomePictures;

impl OutputDirectory for HomePictures {
    fn default_output_dir(&self) -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join("Pictures"))
            .unwrap_or_else(current_dir)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentDir;

impl OutputDirectory for CurrentDir {
    fn default_output_dir(&self) -> PathBuf {
        current_dir()
    }
}

/// A directory chosen up front, from config or the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDirectory(pub PathBuf);

impl OutputDirectory for FixedDirectory {
    fn default_output_dir(&self) -> PathBuf {
        self.0.clone()
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// The implementation for the platform this binary was built for.
pub fn platform_default() -> Box<dyn OutputDirectory> {
    #[cfg(target_os = "linux")]
    {
        Box::new(XdgPictures)
    }
    #[cfg(target_os = "windows")]
    {
        Box::new(HomePictures)
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Box::new(CurrentDir)
    }
}

/// A configured directory wins over the platform default.
pub fn resolve(configured: Option<&Path>) -> Box<dyn OutputDirectory> {
    match configured {
        Some(dir) => Box::new(FixedDirectory(dir.to_path_buf())),
        None => platform_default(),
    }
}

/// `memeify-YYYY-MM-DD-HH-MM-SS.png` for the given local time.
pub fn export_file_name(at: DateTime<Local>) -> String {
    format!("{EXPORT_PREFIX}{}.png", at.format(EXPORT_TIMESTAMP_FORMAT))
}

/// Parse the timestamp back out of an export file name.
///
/// Returns `None` for names that don't follow the export pattern.
pub fn parse_export_file_name(name: &str) -> Option<chrono::NaiveDateTime> {
    let stamp = name.strip_prefix(EXPORT_PREFIX)?.strip_suffix(".png")?;
    chrono::NaiveDateTime::parse_from_str(stamp, EXPORT_TIMESTAMP_FORMAT).ok()
}
