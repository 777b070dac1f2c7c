//! Line-oriented event script read by `memeify session`.
//!
//! One event per line:
//!
//! ```text
//! load photos/cat.jpg
//! memeify deep fry | TOP TEXT | BOTTOM TEXT
//! memeify none | | ONLY BOTTOM
//! export
//! close
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The memeify filter
//! slot accepts any spelling [`Filter`]'s `FromStr` accepts, or `none`.
//! Caption fields are trimmed; missing trailing fields are empty.

use crate::caption::Captions;
use crate::imaging::{Filter, UnknownFilter};
use crate::shell::{Event, MemeRequest};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown command '{0}' (expected load, memeify, export or close)")]
    UnknownCommand(String),
    #[error("'load' needs a path")]
    MissingPath,
    #[error("'{0}' takes no arguments")]
    UnexpectedArguments(&'static str),
    #[error("'memeify' takes at most three '|'-separated fields")]
    TooManyFields,
    #[error(transparent)]
    Filter(#[from] UnknownFilter),
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Event>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let event = match command.to_ascii_lowercase().as_str() {
        "load" if rest.is_empty() => return Err(ScriptError::MissingPath),
        "load" => Event::Load(PathBuf::from(rest)),
        "memeify" => Event::Memeify(parse_request(rest)?),
        "export" => no_arguments("export", rest, Event::Export)?,
        "close" | "exit" | "quit" => no_arguments("close", rest, Event::Close)?,
        _ => return Err(ScriptError::UnknownCommand(command.to_string())),
    };
    Ok(Some(event))
}

fn no_arguments(name: &'static str, rest: &str, event: Event) -> Result<Event, ScriptError> {
    if rest.is_empty() {
        Ok(event)
    } else {
        Err(ScriptError::UnexpectedArguments(name))
    }
}

fn parse_request(rest: &str) -> Result<MemeRequest, ScriptError> {
    let mut fields = rest.split('|').map(str::trim);
    let filter = match fields.next().unwrap_or("") {
        "" => None,
        name if name.eq_ignore_ascii_case("none") => None,
        name => Some(name.parse::<Filter>()?),
    };
    let top = fields.next().unwrap_or("");
    let bottom = fields.next().unwrap_or("");
    if fields.next().is_some() {
        return Err(ScriptError::TooManyFields);
    }
    Ok(MemeRequest {
        filter,
        captions: Captions::new(top, bottom),
    })
}

/// Parse a whole script, stopping at the first bad line.
///
/// Errors carry the 1-based line number.
pub fn parse_script(text: &str) -> Result<Vec<Event>, (usize, ScriptError)> {
    let mut events = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(event) = parse_line(line).map_err(|e| (index + 1, e))? {
            events.push(event);
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(filter: Option<Filter>, top: &str, bottom: &str) -> Option<Event> {
        Some(Event::Memeify(MemeRequest {
            filter,
            captions: Captions::new(top, bottom),
        }))
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(parse_line("# a comment"), Ok(None));
    }

    #[test]
    fn load_keeps_spaces_in_path() {
        assert_eq!(
            parse_line("load  my photos/cat pic.jpg "),
            Ok(Some(Event::Load(PathBuf::from("my photos/cat pic.jpg"))))
        );
    }

    #[test]
    fn load_without_path() {
        assert_eq!(parse_line("load"), Err(ScriptError::MissingPath));
    }

    #[test]
    fn memeify_full() {
        assert_eq!(
            parse_line("memeify deep fry | ONE DOES NOT | SIMPLY"),
            Ok(request(Some(Filter::DeepFry), "ONE DOES NOT", "SIMPLY"))
        );
    }

    #[test]
    fn memeify_partial_fields() {
        assert_eq!(parse_line("memeify swirl"), Ok(request(Some(Filter::Swirl), "", "")));
        assert_eq!(
            parse_line("memeify none | | bottom only"),
            Ok(request(None, "", "bottom only"))
        );
        assert_eq!(parse_line("memeify"), Ok(request(None, "", "")));
        assert_eq!(
            parse_line("MEMEIFY Rotational-Blur|top"),
            Ok(request(Some(Filter::RotationalBlur), "top", ""))
        );
    }

    #[test]
    fn memeify_rejects_unknown_filter() {
        assert!(matches!(
            parse_line("memeify sepia | a | b"),
            Err(ScriptError::Filter(UnknownFilter(ref name))) if name == "sepia"
        ));
    }

    #[test]
    fn memeify_rejects_extra_fields() {
        assert_eq!(
            parse_line("memeify invert | a | b | c"),
            Err(ScriptError::TooManyFields)
        );
    }

    #[test]
    fn export_and_close() {
        assert_eq!(parse_line("export"), Ok(Some(Event::Export)));
        assert_eq!(parse_line("close"), Ok(Some(Event::Close)));
        assert_eq!(parse_line("quit"), Ok(Some(Event::Close)));
        assert_eq!(
            parse_line("export now"),
            Err(ScriptError::UnexpectedArguments("export"))
        );
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_line("undo"),
            Err(ScriptError::UnknownCommand("undo".into()))
        );
    }

    #[test]
    fn parse_script_reports_line_number() {
        let text = "load a.png\n\nmemeify invert\nfrobnicate\nexport\n";
        let (line, err) = parse_script(text).unwrap_err();
        assert_eq!(line, 4);
        assert!(matches!(err, ScriptError::UnknownCommand(_)));
    }

    #[test]
    fn parse_script_collects_events() {
        let events = parse_script("load a.png\n# go\nmemeify invert\nexport\nclose\n").unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[3], Event::Close);
    }
}
