//! Immediate-mode widget toolkit.
//!
//! Screens never keep widget objects. Every frame they call the drawing
//! functions of a [`Toolkit`] again, and each call both queues the widget for
//! drawing and reports what the user did to it since the previous frame.
//!
//! Two implementations exist:
//! - [`TerminalToolkit`]: ratatui over any `Backend`, fed by crossterm events
//! - [`HeadlessToolkit`]: scripted input and a draw log, for tests

mod headless;
mod terminal;

pub use headless::{DrawRecord, HeadlessToolkit, WidgetKind};
pub use terminal::{CrosstermEvents, EventSource, QueuedEvents, TerminalToolkit};

use super::buffer::TextField;
use super::dialog::DialogResponse;
use super::layout::WindowSize;
use super::theme::ColorScheme;
use ratatui::layout::Rect;
use std::io;

/// Stable identity of an interactive widget across frames.
pub type WidgetId = &'static str;

/// Emphasis of a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    Title,
    #[default]
    Text,
    Muted,
    Warning,
    Error,
}

/// Drawing and input surface for one frame at a time.
///
/// Between `begin_frame` and `end_frame` every widget call draws the widget
/// and returns its interaction result. While locked, non-modal widgets are
/// drawn but report no interaction; message boxes ignore the lock.
pub trait Toolkit {
    /// Collect input for the frame about to be built.
    fn begin_frame(&mut self) -> io::Result<()>;

    /// Present everything queued since `begin_frame`.
    fn end_frame(&mut self) -> io::Result<()>;

    fn window_size(&self) -> WindowSize;

    /// New window size if a resize happened since the last call.
    fn take_resize(&mut self) -> Option<WindowSize>;

    fn set_locked(&mut self, locked: bool);

    fn is_locked(&self) -> bool;

    fn set_theme(&mut self, scheme: ColorScheme);

    fn label(&mut self, bounds: Rect, text: &str, tone: Tone);

    /// Returns `true` on the frame the button is pressed.
    fn button(&mut self, id: WidgetId, bounds: Rect, label: &str) -> bool;

    /// Returns `true` when the field was edited this frame.
    fn text_input(&mut self, id: WidgetId, bounds: Rect, label: &str, field: &mut TextField)
        -> bool;

    /// Returns `true` when `checked` was toggled this frame.
    fn checkbox(&mut self, id: WidgetId, bounds: Rect, label: &str, checked: &mut bool) -> bool;

    /// Returns `true` when `selected` changed this frame.
    fn dropdown(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        options: &[&str],
        selected: &mut usize,
    ) -> bool;

    fn scroll_panel(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        title: &str,
        content: &str,
        scroll: &mut u16,
    );

    /// Modal dialog. Answers only count once the box has been on screen for
    /// a full frame, so the input that opened it cannot also answer it.
    fn message_box(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        title: &str,
        message: &str,
        buttons: &[&str],
    ) -> DialogResponse;

    fn status_bar(&mut self, bounds: Rect, text: &str);

    /// Replace the frame with a "terminal too small" notice.
    fn size_warning(&mut self, required: WindowSize);

    /// Whether the user asked to quit (Ctrl-C).
    fn close_requested(&self) -> bool;
}
