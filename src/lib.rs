//! # memeify
//!
//! Load an image, caption it, run it through a filter, save the meme.
//!
//! # Architecture: Shell Over Pure Transforms
//!
//! Everything that touches pixels is a pure function from one PNG-encoded
//! [`ImageBuffer`](imaging::ImageBuffer) to a new one. The [`shell`] owns the
//! single working buffer and is the only place state changes:
//!
//! ```text
//! front end ── Event ──► Shell ──► caption / filter ──► new buffer
//!     ▲                    │
//!     └── ShellUpdate ─────┘  (layout + thumbnail [+ saved path])
//! ```
//!
//! The front end never holds the image; it shows the thumbnail it gets back
//! and the controls the returned [`Layout`](shell::Layout) lists. The bundled
//! binary is one such front end, reading events from the command line or
//! from stdin.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`caption`] | Auto-fit font sizing and outlined caption drawing |
//! | [`imaging`] | Image buffer, thumbnails, and the seven filters |
//! | [`shell`] | Editing → Previewing → Exported state machine |
//! | [`platform`] | Default output directory per platform, export file names |
//! | [`script`] | Line-oriented event syntax for `memeify session` |
//! | [`config`] | `memeify.toml` loading, validation, merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed-Step Caption Fitting
//!
//! Caption size is found by stepping down from 200 by 2 until the measured
//! text fits a box as wide as the image and 200 pixels tall, giving up after
//! 100 measurements. A binary search would take fewer steps, but the linear
//! schedule is predictable: the same text on the same image always lands on
//! the same size. Measurement sits behind [`caption::TextMeasure`] so the
//! schedule is tested without fonts.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and encoding use the `image` crate; seam carving, warps, and text
//! drawing come from `imageproc`, glyphs from `ab_glyph`. No ImageMagick, no
//! system fonts: a bold sans-serif ships inside the binary, and a different
//! font file can be configured.
//!
//! ## PNG as the Working Format
//!
//! The working buffer is always PNG, so chaining filters never adds
//! compression loss of its own. The only lossy step is the JPEG round trip
//! that deep fry performs on purpose.

pub mod caption;
pub mod config;
pub mod imaging;
pub mod output;
pub mod platform;
pub mod script;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_helpers;
