//! The application shell: one working image, three layouts, four events.
//!
//! ```text
//!            Load            Memeify              Export
//!   Editing ──────► Editing ─────────► Previewing ──────► Exported
//!      │                                  │  ▲
//!      │            Export                │  │ Memeify (chains onto the
//!      └──────────────────────────────► Exported  current buffer)
//! ```
//!
//! The shell is toolkit-independent. A front end reads user input, turns it
//! into an [`Event`], and hands it to [`Shell::handle`]; every successful
//! event comes back as a [`ShellUpdate`] carrying the layout to show and a
//! fresh thumbnail. Which widgets each layout shows is described by
//! [`Layout::controls`], and an event is only accepted when the current
//! layout shows the control that triggers it.
//!
//! Errors are terminal for the action only (state is left as it was), except
//! a caption that cannot be fitted, which ends the session
//! ([`ShellError::is_fatal`]).

use crate::caption::{CaptionError, Captioner, Captions};
use crate::config::MemeifyConfig;
use crate::imaging::{BufferError, Filter, FilterError, FilterParams, ImageBuffer, thumbnail};
use crate::platform::{self, OutputDirectory};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Window title of the editing and preview layouts.
pub const APP_TITLE: &str = concat!("memeify ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Pick a file, load it, choose a filter and captions.
    Editing,
    /// The transformed image, ready for another pass or export. No file picker.
    Previewing,
    /// Read-only result with the save confirmation.
    Exported,
}

/// Widgets a layout shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Image,
    FilePicker,
    LoadButton,
    FilterSelector,
    CaptionFields,
    MemeifyButton,
    ExportButton,
    Confirmation,
}

impl Layout {
    pub fn controls(self) -> &'static [Control] {
        use Control::*;
        match self {
            Layout::Editing => &[
                Image,
                FilePicker,
                LoadButton,
                FilterSelector,
                CaptionFields,
                MemeifyButton,
                ExportButton,
            ],
            Layout::Previewing => &[
                Image,
                FilterSelector,
                CaptionFields,
                MemeifyButton,
                ExportButton,
            ],
            Layout::Exported => &[Image, Confirmation],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Layout::Editing | Layout::Previewing => APP_TITLE,
            Layout::Exported => "memeification complete!",
        }
    }

    pub fn shows(self, control: Control) -> bool {
        self.controls().contains(&control)
    }

    /// Close is always available; everything else needs its control on screen.
    pub fn accepts(self, event: &Event) -> bool {
        match event {
            Event::Load(_) => self.shows(Control::LoadButton),
            Event::Memeify(_) => self.shows(Control::MemeifyButton),
            Event::Export => self.shows(Control::ExportButton),
            Event::Close => true,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Editing => "editing",
            Layout::Previewing => "previewing",
            Layout::Exported => "exported",
        })
    }
}

/// What the memeify button submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemeRequest {
    /// `None` applies captions only.
    pub filter: Option<Filter>,
    pub captions: Captions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Load(PathBuf),
    Memeify(MemeRequest),
    Export,
    Close,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Load(_) => "load",
            Event::Memeify(_) => "memeify",
            Event::Export => "export",
            Event::Close => "close",
        }
    }
}

/// Result of a successful event, everything a front end needs to redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellUpdate {
    pub layout: Layout,
    pub thumbnail: ImageBuffer,
    pub thumbnail_size: (u32, u32),
    /// Dimensions of the full working image.
    pub image_size: (u32, u32),
    /// Set by export only.
    pub saved_to: Option<PathBuf>,
}

impl ShellUpdate {
    /// Text for the confirmation line of the exported layout.
    pub fn confirmation(&self) -> Option<String> {
        self.saved_to
            .as_ref()
            .map(|path| format!("Image saved as: {}", path.display()))
    }
}

#[derive(Debug)]
pub enum Step {
    Updated(ShellUpdate),
    Closed,
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("No image loaded")]
    NoImageLoaded,
    #[error("Cannot {event} while {layout}")]
    InvalidTransition { event: &'static str, layout: Layout },
    #[error(transparent)]
    Caption(#[from] CaptionError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ShellError {
    /// Whether the session has to end. Only caption fit failures do.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Caption(e) if e.is_fit_failure())
    }
}

/// Owns the working image and routes events.
pub struct Shell {
    layout: Layout,
    buffer: Option<ImageBuffer>,
    captioner: Captioner,
    params: FilterParams,
    thumbnail_size: u32,
    output: Box<dyn OutputDirectory>,
    clock: fn() -> DateTime<Local>,
}

impl Shell {
    pub fn new(
        captioner: Captioner,
        params: FilterParams,
        thumbnail_size: u32,
        output: Box<dyn OutputDirectory>,
    ) -> Self {
        Self {
            layout: Layout::Editing,
            buffer: None,
            captioner,
            params,
            thumbnail_size,
            output,
            clock: Local::now,
        }
    }

    /// Build a shell from a resolved config. Fails only if a configured font
    /// can't be loaded.
    pub fn from_config(config: &MemeifyConfig) -> Result<Self, CaptionError> {
        Ok(Self::new(
            Captioner::from_config(&config.caption)?,
            FilterParams::from_config(&config.filters),
            config.preview.thumbnail_size,
            platform::resolve(config.export.directory.as_deref()),
        ))
    }

    /// Replace the time source used for export names.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn buffer(&self) -> Option<&ImageBuffer> {
        self.buffer.as_ref()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output.default_output_dir()
    }

    /// Process one event. On error the layout and buffer are unchanged.
    pub fn handle(&mut self, event: Event) -> Result<Step, ShellError> {
        if !self.layout.accepts(&event) {
            return Err(ShellError::InvalidTransition {
                event: event.name(),
                layout: self.layout,
            });
        }
        debug!(event = event.name(), layout = %self.layout, "handling event");

        let update = match event {
            Event::Load(path) => self.load(&path)?,
            Event::Memeify(request) => self.memeify(&request)?,
            Event::Export => self.export()?,
            Event::Close => {
                info!("session closed");
                return Ok(Step::Closed);
            }
        };
        Ok(Step::Updated(update))
    }

    /// Feed events until they run out, a close arrives, or a fatal error.
    ///
    /// `report` sees every outcome, including recoverable errors, which
    /// don't stop the loop.
    pub fn run<I, F>(&mut self, events: I, mut report: F) -> Result<(), ShellError>
    where
        I: IntoIterator<Item = Event>,
        F: FnMut(Result<&ShellUpdate, &ShellError>),
    {
        for event in events {
            match self.handle(event) {
                Ok(Step::Updated(update)) => report(Ok(&update)),
                Ok(Step::Closed) => return Ok(()),
                Err(e) if e.is_fatal() => {
                    report(Err(&e));
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, "event failed");
                    report(Err(&e));
                }
            }
        }
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<ShellUpdate, ShellError> {
        if !path.exists() {
            return Err(ShellError::InputNotFound(path.to_path_buf()));
        }
        let buffer = ImageBuffer::open(path)?;
        let update = self.update_for(&buffer, Layout::Editing, None)?;
        info!(path = %path.display(), "loaded image");
        self.buffer = Some(buffer);
        Ok(update)
    }

    fn memeify(&mut self, request: &MemeRequest) -> Result<ShellUpdate, ShellError> {
        let current = self.buffer.as_ref().ok_or(ShellError::NoImageLoaded)?;

        let captioned = if request.captions.is_empty() {
            current.clone()
        } else {
            self.captioner.caption(current, &request.captions)?
        };
        let result = match request.filter {
            Some(filter) => filter.apply(&captioned, &self.params)?,
            None => captioned,
        };

        let update = self.update_for(&result, Layout::Previewing, None)?;
        self.buffer = Some(result);
        self.layout = Layout::Previewing;
        Ok(update)
    }

    fn export(&mut self) -> Result<ShellUpdate, ShellError> {
        let buffer = self.buffer.as_ref().ok_or(ShellError::NoImageLoaded)?;

        let dir = self.output.default_output_dir();
        std::fs::create_dir_all(&dir).map_err(|source| ShellError::OutputDir {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(platform::export_file_name((self.clock)()));
        buffer.save(&path)?;
        info!(path = %path.display(), bytes = buffer.len(), "exported image");

        let update = self.update_for(buffer, Layout::Exported, Some(path))?;
        self.layout = Layout::Exported;
        Ok(update)
    }

    fn update_for(
        &self,
        buffer: &ImageBuffer,
        layout: Layout,
        saved_to: Option<PathBuf>,
    ) -> Result<ShellUpdate, ShellError> {
        let thumb = thumbnail(buffer, self.thumbnail_size)?;
        Ok(ShellUpdate {
            layout,
            thumbnail_size: thumb.dimensions()?,
            thumbnail: thumb,
            image_size: buffer.dimensions()?,
            saved_to,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::CaptionStyle;
    use crate::platform::{FixedDirectory, parse_export_file_name};
    use crate::test_helpers::{gradient_image, write_png};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 17, 13, 4, 9).unwrap()
    }

    fn shell_in(dir: &Path) -> Shell {
        Shell::new(
            Captioner::with_default_font(CaptionStyle::default()),
            FilterParams::default(),
            500,
            Box::new(FixedDirectory(dir.to_path_buf())),
        )
        .with_clock(fixed_time)
    }

    fn loaded_shell(tmp: &TempDir, w: u32, h: u32) -> Shell {
        let input = tmp.path().join("input.png");
        write_png(&input, w, h);
        let mut shell = shell_in(&tmp.path().join("out"));
        shell.handle(Event::Load(input)).unwrap();
        shell
    }

    fn updated(step: Step) -> ShellUpdate {
        match step {
            Step::Updated(update) => update,
            Step::Closed => panic!("expected an update"),
        }
    }

    fn memeify(filter: Option<Filter>, top: &str, bottom: &str) -> Event {
        Event::Memeify(MemeRequest {
            filter,
            captions: Captions::new(top, bottom),
        })
    }

    // =========================================================================
    // Layout tests
    // =========================================================================

    #[test]
    fn previewing_hides_file_picker() {
        assert!(Layout::Editing.shows(Control::FilePicker));
        assert!(!Layout::Previewing.shows(Control::FilePicker));
        assert!(!Layout::Previewing.shows(Control::LoadButton));
        assert!(Layout::Previewing.shows(Control::ExportButton));
    }

    #[test]
    fn exported_is_read_only() {
        assert_eq!(
            Layout::Exported.controls(),
            &[Control::Image, Control::Confirmation]
        );
        assert!(!Layout::Exported.accepts(&Event::Export));
        assert!(!Layout::Exported.accepts(&memeify(None, "a", "")));
        assert!(Layout::Exported.accepts(&Event::Close));
    }

    #[test]
    fn titles() {
        assert!(Layout::Editing.title().starts_with("memeify "));
        assert_eq!(Layout::Previewing.title(), Layout::Editing.title());
        assert_eq!(Layout::Exported.title(), "memeification complete!");
    }

    // =========================================================================
    // Event handling tests
    // =========================================================================

    #[test]
    fn load_returns_thumbnail_and_stays_editing() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input.png");
        write_png(&input, 1000, 800);
        let mut shell = shell_in(tmp.path());

        let update = updated(shell.handle(Event::Load(input)).unwrap());
        assert_eq!(update.layout, Layout::Editing);
        assert_eq!(update.image_size, (1000, 800));
        assert_eq!(update.thumbnail_size, (500, 400));
        assert_eq!(update.saved_to, None);
        assert!(shell.buffer().is_some());
    }

    #[test]
    fn load_missing_file_leaves_state_unchanged() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 40, 30);
        let before = shell.buffer().cloned();

        let err = shell
            .handle(Event::Load(tmp.path().join("nope.png")))
            .unwrap_err();
        assert!(matches!(err, ShellError::InputNotFound(_)));
        assert!(!err.is_fatal());
        assert_eq!(shell.layout(), Layout::Editing);
        assert_eq!(shell.buffer().cloned(), before);
    }

    #[test]
    fn load_undecodable_file_is_buffer_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("junk.png");
        std::fs::write(&path, b"junk").unwrap();
        let mut shell = shell_in(tmp.path());

        let err = shell.handle(Event::Load(path)).unwrap_err();
        assert!(matches!(err, ShellError::Buffer(BufferError::Decode { .. })));
        assert!(shell.buffer().is_none());
    }

    #[test]
    fn memeify_before_load_is_no_image() {
        let tmp = TempDir::new().unwrap();
        let mut shell = shell_in(tmp.path());
        let err = shell.handle(memeify(Some(Filter::Invert), "", "")).unwrap_err();
        assert!(matches!(err, ShellError::NoImageLoaded));
        assert_eq!(shell.layout(), Layout::Editing);
    }

    #[test]
    fn export_before_load_is_no_image() {
        let tmp = TempDir::new().unwrap();
        let mut shell = shell_in(tmp.path());
        assert!(matches!(
            shell.handle(Event::Export),
            Err(ShellError::NoImageLoaded)
        ));
    }

    #[test]
    fn memeify_moves_to_previewing() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 60, 40);

        let update = updated(shell.handle(memeify(Some(Filter::Invert), "", "")).unwrap());
        assert_eq!(update.layout, Layout::Previewing);
        assert_eq!(shell.layout(), Layout::Previewing);
        assert_eq!(update.image_size, (60, 40));
    }

    #[test]
    fn memeify_replaces_buffer_with_filtered_pixels() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 60, 40);
        let original = gradient_image(60, 40).to_rgb8();

        shell.handle(memeify(Some(Filter::Invert), "", "")).unwrap();
        let inverted = shell.buffer().unwrap().decode().unwrap().to_rgb8();
        let [r, g, b] = original.get_pixel(5, 7).0;
        assert_eq!(inverted.get_pixel(5, 7).0, [255 - r, 255 - g, 255 - b]);
    }

    #[test]
    fn memeify_chains_from_previewing() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 60, 40);
        let original = shell.buffer().unwrap().decode().unwrap().to_rgb8();

        shell.handle(memeify(Some(Filter::Invert), "", "")).unwrap();
        shell.handle(memeify(Some(Filter::Invert), "", "")).unwrap();
        let restored = shell.buffer().unwrap().decode().unwrap().to_rgb8();
        assert_eq!(restored, original);
        assert_eq!(shell.layout(), Layout::Previewing);
    }

    #[test]
    fn memeify_without_filter_or_captions_keeps_pixels() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 30, 30);
        let before = shell.buffer().cloned();
        shell.handle(memeify(None, "", "")).unwrap();
        assert_eq!(shell.buffer().cloned(), before);
        assert_eq!(shell.layout(), Layout::Previewing);
    }

    #[test]
    fn load_from_previewing_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 30, 30);
        shell.handle(memeify(None, "", "")).unwrap();

        let err = shell
            .handle(Event::Load(tmp.path().join("input.png")))
            .unwrap_err();
        assert!(matches!(
            err,
            ShellError::InvalidTransition {
                event: "load",
                layout: Layout::Previewing
            }
        ));
        assert_eq!(err.to_string(), "Cannot load while previewing");
    }

    #[test]
    fn export_writes_timestamped_png() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 200, 120);
        shell.handle(memeify(Some(Filter::Invert), "TOP", "")).unwrap();

        let update = updated(shell.handle(Event::Export).unwrap());
        let saved = update.saved_to.clone().unwrap();
        assert_eq!(update.layout, Layout::Exported);
        assert_eq!(saved.parent().unwrap(), tmp.path().join("out"));
        let name = saved.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "memeify-2024-05-17-13-04-09.png");
        assert_eq!(
            parse_export_file_name(name).unwrap(),
            fixed_time().naive_local()
        );
        assert_eq!(std::fs::read(&saved).unwrap(), shell.buffer().unwrap().as_bytes());
        assert_eq!(
            update.confirmation().unwrap(),
            format!("Image saved as: {}", saved.display())
        );
    }

    #[test]
    fn export_straight_from_editing() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 20, 20);
        let update = updated(shell.handle(Event::Export).unwrap());
        assert_eq!(update.layout, Layout::Exported);
        assert!(update.saved_to.unwrap().exists());
    }

    #[test]
    fn exported_rejects_everything_but_close() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 20, 20);
        shell.handle(Event::Export).unwrap();

        assert!(matches!(
            shell.handle(Event::Export),
            Err(ShellError::InvalidTransition { .. })
        ));
        assert!(matches!(
            shell.handle(memeify(None, "x", "")),
            Err(ShellError::InvalidTransition { .. })
        ));
        assert!(matches!(shell.handle(Event::Close), Ok(Step::Closed)));
    }

    #[test]
    fn caption_fit_failure_is_fatal_and_keeps_buffer() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 2, 2);
        let before = shell.buffer().cloned();

        let err = shell.handle(memeify(None, "HELLO", "")).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(shell.layout(), Layout::Editing);
        assert_eq!(shell.buffer().cloned(), before);
    }

    // =========================================================================
    // run tests
    // =========================================================================

    #[test]
    fn run_continues_past_recoverable_errors() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input.png");
        write_png(&input, 50, 50);
        let mut shell = shell_in(&tmp.path().join("out"));

        let mut outcomes = Vec::new();
        let events = vec![
            memeify(None, "", ""),
            Event::Load(tmp.path().join("missing.png")),
            Event::Load(input),
            memeify(Some(Filter::Invert), "", ""),
            Event::Export,
            Event::Close,
            Event::Export,
        ];
        shell
            .run(events, |outcome| outcomes.push(outcome.is_ok()))
            .unwrap();

        assert_eq!(outcomes, vec![false, false, true, true, true]);
        assert_eq!(shell.layout(), Layout::Exported);
    }

    #[test]
    fn run_stops_on_fatal_error() {
        let tmp = TempDir::new().unwrap();
        let mut shell = loaded_shell(&tmp, 2, 2);

        let mut reported = 0;
        let result = shell.run(
            vec![memeify(None, "", "HELLO"), Event::Export],
            |_| reported += 1,
        );
        assert!(matches!(result, Err(ref e) if e.is_fatal()));
        assert_eq!(reported, 1);
        assert_eq!(shell.layout(), Layout::Editing);
    }
}
