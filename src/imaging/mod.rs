//! Image processing with the `image` / `imageproc` stack, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image::ImageReader` |
//! | Working format | PNG bytes ([`ImageBuffer`]) |
//! | Thumbnail | `resize_exact` with `Nearest` |
//! | Deep fry | `resize_exact` (Lanczos3) + posterize + `JpegEncoder` |
//! | Liquid rescale | `imageproc::seam_carving::shrink_width` |
//! | Implode / explode / swirl | `imageproc::geometric_transformations::warp_with` |
//! | Invert | `image::imageops::invert` |
//! | Rotational blur | arc sampling in [`warp`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and channel math (unit testable)
//! - **Parameters**: Data structures describing filter settings
//! - **Buffer**: [`ImageBuffer`] encode/decode and thumbnails
//! - **Filters**: the [`Filter`] menu, one pure function per entry
//! - **Warp**: coordinate mappings for the displacement filters

pub mod buffer;
pub mod calculations;
pub mod filters;
mod params;
pub mod warp;

pub use buffer::{BufferError, ImageBuffer, thumbnail};
pub use filters::{Filter, FilterError, UnknownFilter};
pub use params::{FilterParams, Quality};
