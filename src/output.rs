//! CLI output formatting.
//!
//! The CLI is the text rendition of the three layouts: after every event it
//! prints which layout is showing, the size of the working image and its
//! preview, the controls on screen, and (after an export) the confirmation
//! line.
//!
//! # Output Format
//!
//! ## Session banner
//!
//! ```text
//! memeify 0.2.3
//!     Theme: DarkAmber
//!     Output: /home/me/Pictures
//! ```
//!
//! ## Event results
//!
//! ```text
//! memeify 0.2.3 [previewing]
//!     Image: 1000x800
//!     Preview: 500x400
//!     Controls: image, filter, captions, memeify, export
//!
//! memeification complete! [exported]
//!     Image: 1000x800
//!     Preview: 500x400
//!     Controls: image, confirmation
//!     Image saved as: /home/me/Pictures/memeify-2024-05-17-13-04-09.png
//! ```
//!
//! ## Filter menu
//!
//! ```text
//! 001 deep fry
//! 002 liquid rescale
//! ...
//! 006 invert (self-inverse)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions are pure.

use crate::imaging::Filter;
use crate::script::ScriptError;
use crate::shell::{APP_TITLE, Control, ShellError, ShellUpdate};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn control_label(control: Control) -> &'static str {
    match control {
        Control::Image => "image",
        Control::FilePicker => "file picker",
        Control::LoadButton => "load",
        Control::FilterSelector => "filter",
        Control::CaptionFields => "captions",
        Control::MemeifyButton => "memeify",
        Control::ExportButton => "export",
        Control::Confirmation => "confirmation",
    }
}

fn dimensions((w, h): (u32, u32)) -> String {
    format!("{w}x{h}")
}

pub fn format_session_banner(theme: &str, output_dir: &Path) -> Vec<String> {
    vec![
        APP_TITLE.to_string(),
        format!("{}Theme: {}", indent(1), theme),
        format!("{}Output: {}", indent(1), output_dir.display()),
    ]
}

pub fn print_session_banner(theme: &str, output_dir: &Path) {
    for line in format_session_banner(theme, output_dir) {
        println!("{}", line);
    }
}

pub fn format_update(update: &ShellUpdate) -> Vec<String> {
    let controls: Vec<&str> = update
        .layout
        .controls()
        .iter()
        .map(|&c| control_label(c))
        .collect();

    let mut lines = vec![
        format!("{} [{}]", update.layout.title(), update.layout),
        format!("{}Image: {}", indent(1), dimensions(update.image_size)),
        format!("{}Preview: {}", indent(1), dimensions(update.thumbnail_size)),
        format!("{}Controls: {}", indent(1), controls.join(", ")),
    ];
    if let Some(confirmation) = update.confirmation() {
        lines.push(format!("{}{}", indent(1), confirmation));
    }
    lines
}

pub fn print_update(update: &ShellUpdate) {
    for line in format_update(update) {
        println!("{}", line);
    }
}

pub fn format_error(error: &ShellError) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];
    if error.is_fatal() {
        lines.push(format!("{}Session ended", indent(1)));
    }
    lines
}

pub fn print_error(error: &ShellError) {
    for line in format_error(error) {
        eprintln!("{}", line);
    }
}

pub fn format_script_error(line_number: usize, error: &ScriptError) -> String {
    format!("Line {}: {}", line_number, error)
}

pub fn print_script_error(line_number: usize, error: &ScriptError) {
    eprintln!("{}", format_script_error(line_number, error));
}

/// The filter menu in selector order.
pub fn format_filter_menu() -> Vec<String> {
    Filter::ALL
        .iter()
        .enumerate()
        .map(|(i, filter)| {
            if filter.is_involution() {
                format!("{} {} (self-inverse)", format_index(i + 1), filter)
            } else {
                format!("{} {}", format_index(i + 1), filter)
            }
        })
        .collect()
}

pub fn print_filter_menu() {
    for line in format_filter_menu() {
        println!("{}", line);
    }
}
