//! Scripted toolkit for tests.
//!
//! Input is queued with [`HeadlessToolkit::press`], [`HeadlessToolkit::type_into`]
//! and friends before a frame and applies to that frame only. Every widget
//! call is recorded; the records of the last finished frame stay available
//! until the next one ends.

use super::{Tone, Toolkit, WidgetId};
use crate::tui::buffer::TextField;
use crate::tui::dialog::DialogResponse;
use crate::tui::layout::WindowSize;
use crate::tui::theme::ColorScheme;
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Label,
    Button,
    TextInput,
    Checkbox,
    Dropdown,
    ScrollPanel,
    MessageBox,
    StatusBar,
    SizeWarning,
}

/// One widget call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub kind: WidgetKind,
    pub id: Option<WidgetId>,
    pub bounds: Rect,
    /// Label or title
    pub title: String,
    /// Displayed content (masked for secret fields)
    pub text: String,
    pub locked: bool,
}

#[derive(Debug, Default)]
struct Script {
    presses: Vec<WidgetId>,
    typed: HashMap<WidgetId, String>,
    toggles: Vec<WidgetId>,
    selections: HashMap<WidgetId, usize>,
    answer: Option<usize>,
}

#[derive(Debug)]
pub struct HeadlessToolkit {
    window: WindowSize,
    resized: Option<WindowSize>,
    locked: bool,
    close: bool,
    scheme: ColorScheme,
    script: Script,
    current: Vec<DrawRecord>,
    last: Vec<DrawRecord>,
    shown_modal: Option<WidgetId>,
    armed_modal: Option<WidgetId>,
    frames: usize,
}

impl HeadlessToolkit {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            window: WindowSize::new(width, height),
            resized: None,
            locked: false,
            close: false,
            scheme: ColorScheme::default(),
            script: Script::default(),
            current: Vec::new(),
            last: Vec::new(),
            shown_modal: None,
            armed_modal: None,
            frames: 0,
        }
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    pub fn press(&mut self, id: WidgetId) -> &mut Self {
        self.script.presses.push(id);
        self
    }

    /// Replace the content of the input `id`.
    pub fn type_into(&mut self, id: WidgetId, text: &str) -> &mut Self {
        self.script.typed.insert(id, text.to_string());
        self
    }

    pub fn toggle(&mut self, id: WidgetId) -> &mut Self {
        self.script.toggles.push(id);
        self
    }

    pub fn select(&mut self, id: WidgetId, index: usize) -> &mut Self {
        self.script.selections.insert(id, index);
        self
    }

    /// Answer the message box that was on screen in the previous frame.
    pub fn answer(&mut self, index: usize) -> &mut Self {
        self.script.answer = Some(index);
        self
    }

    pub fn resize(&mut self, width: u16, height: u16) -> &mut Self {
        self.window = WindowSize::new(width, height);
        self.resized = Some(self.window);
        self
    }

    pub fn request_close(&mut self) -> &mut Self {
        self.close = true;
        self
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Records of the last finished frame.
    pub fn last_frame(&self) -> &[DrawRecord] {
        &self.last
    }

    pub fn find(&self, id: WidgetId) -> Option<&DrawRecord> {
        self.last.iter().find(|r| r.id == Some(id))
    }

    /// Message boxes drawn in the last finished frame.
    pub fn dialogs(&self) -> Vec<&DrawRecord> {
        self.last
            .iter()
            .filter(|r| r.kind == WidgetKind::MessageBox)
            .collect()
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme
    }

    fn record(
        &mut self,
        kind: WidgetKind,
        id: Option<WidgetId>,
        bounds: Rect,
        title: &str,
        text: &str,
    ) {
        let locked = self.locked && kind != WidgetKind::MessageBox;
        self.current.push(DrawRecord {
            kind,
            id,
            bounds,
            title: title.to_string(),
            text: text.to_string(),
            locked,
        });
    }
}

impl Toolkit for HeadlessToolkit {
    fn begin_frame(&mut self) -> io::Result<()> {
        self.current.clear();
        self.locked = false;
        Ok(())
    }

    fn end_frame(&mut self) -> io::Result<()> {
        self.last = std::mem::take(&mut self.current);
        self.armed_modal = self.shown_modal.take();
        self.script = Script::default();
        self.frames += 1;
        Ok(())
    }

    fn window_size(&self) -> WindowSize {
        self.window
    }

    fn take_resize(&mut self) -> Option<WindowSize> {
        self.resized.take()
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_theme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    fn label(&mut self, bounds: Rect, text: &str, _tone: Tone) {
        self.record(WidgetKind::Label, None, bounds, "", text);
    }

    fn button(&mut self, id: WidgetId, bounds: Rect, label: &str) -> bool {
        self.record(WidgetKind::Button, Some(id), bounds, label, "");
        !self.locked && self.script.presses.contains(&id)
    }

    fn text_input(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        label: &str,
        field: &mut TextField,
    ) -> bool {
        let edited = if self.locked {
            false
        } else if let Some(text) = self.script.typed.remove(id) {
            field.set(&text);
            true
        } else {
            false
        };
        self.record(WidgetKind::TextInput, Some(id), bounds, label, &field.display());
        edited
    }

    fn checkbox(&mut self, id: WidgetId, bounds: Rect, label: &str, checked: &mut bool) -> bool {
        let toggled = !self.locked && self.script.toggles.contains(&id);
        if toggled {
            *checked = !*checked;
        }
        let mark = if *checked { "[x]" } else { "[ ]" };
        self.record(WidgetKind::Checkbox, Some(id), bounds, label, mark);
        toggled
    }

    fn dropdown(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        options: &[&str],
        selected: &mut usize,
    ) -> bool {
        let mut changed = false;
        if !self.locked {
            if let Some(index) = self.script.selections.remove(id) {
                if index < options.len() && index != *selected {
                    *selected = index;
                    changed = true;
                }
            }
        }
        let current = options.get(*selected).copied().unwrap_or_default();
        self.record(WidgetKind::Dropdown, Some(id), bounds, "", current);
        changed
    }

    fn scroll_panel(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        title: &str,
        content: &str,
        _scroll: &mut u16,
    ) {
        self.record(WidgetKind::ScrollPanel, Some(id), bounds, title, content);
    }

    fn message_box(
        &mut self,
        id: WidgetId,
        bounds: Rect,
        title: &str,
        message: &str,
        buttons: &[&str],
    ) -> DialogResponse {
        self.record(WidgetKind::MessageBox, Some(id), bounds, title, message);
        self.shown_modal = Some(id);
        if self.armed_modal != Some(id) {
            return DialogResponse::Unanswered;
        }
        match self.script.answer.take() {
            Some(index) if index <= buttons.len() => DialogResponse::Answered(index),
            _ => DialogResponse::Unanswered,
        }
    }

    fn status_bar(&mut self, bounds: Rect, text: &str) {
        self.record(WidgetKind::StatusBar, None, bounds, "", text);
    }

    fn size_warning(&mut self, required: WindowSize) {
        let text = format!("Terminal too small: {} (required {required})", self.window);
        self.record(WidgetKind::SizeWarning, None, self.window.area(), "", &text);
    }

    fn close_requested(&self) -> bool {
        self.close
    }
}
