//! Modal dialogs, the shared error slot and the status line.

use super::flags::FlagRegister;
use super::toolkit::{Toolkit, WidgetId};
use crate::store::StoreError;
use bitflags::Flags;
use chrono::{DateTime, Local};
use ratatui::layout::Rect;

/// Response index of a dialog closed without pressing a button.
pub const DISMISSED: usize = 0;
/// Response index of the affirmative button of a confirm dialog.
pub const CONFIRM: usize = 1;

/// Button set of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// A single "OK"; any answer acknowledges
    Acknowledge,
    /// "Yes" / "No"; only [`CONFIRM`] runs the bound action
    ConfirmCancel,
}

impl DialogKind {
    pub const fn buttons(self) -> &'static [&'static str] {
        match self {
            Self::Acknowledge => &["OK"],
            Self::ConfirmCancel => &["Yes", "No"],
        }
    }
}

/// What a message box reported this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResponse {
    Unanswered,
    /// 0 for dismissal, 1.. for the buttons in order
    Answered(usize),
}

/// Dialog result interpreted for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Still open; keep the flag and show it again next frame
    Waiting,
    /// Confirm dialog answered affirmatively
    Confirmed,
    /// Answered any other way; clear the flag, no side effect
    Closed,
}

pub const fn resolve(kind: DialogKind, response: DialogResponse) -> DialogOutcome {
    match (kind, response) {
        (_, DialogResponse::Unanswered) => DialogOutcome::Waiting,
        (DialogKind::ConfirmCancel, DialogResponse::Answered(CONFIRM)) => DialogOutcome::Confirmed,
        (_, DialogResponse::Answered(_)) => DialogOutcome::Closed,
    }
}

/// A dialog a screen wants to show for one of its conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub id: WidgetId,
    pub title: &'static str,
    pub message: String,
    pub kind: DialogKind,
}

impl Warning {
    pub fn acknowledge(id: WidgetId, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            id,
            title,
            message: message.into(),
            kind: DialogKind::Acknowledge,
        }
    }

    pub fn confirm(id: WidgetId, title: &'static str, message: impl Into<String>) -> Self {
        Self {
            id,
            title,
            message: message.into(),
            kind: DialogKind::ConfirmCancel,
        }
    }

    /// Draw the dialog and interpret this frame's answer.
    pub fn show(&self, ui: &mut dyn Toolkit, bounds: Rect) -> DialogOutcome {
        let response = ui.message_box(self.id, bounds, self.title, &self.message, self.kind.buttons());
        resolve(self.kind, response)
    }

    /// Show the dialog owned by `flag` and clear the flag once it is answered.
    pub fn show_for<F: Flags + Copy>(
        &self,
        ui: &mut dyn Toolkit,
        bounds: Rect,
        flags: &mut FlagRegister<F>,
        flag: F,
    ) -> DialogOutcome {
        let outcome = self.show(ui, bounds);
        if outcome != DialogOutcome::Waiting {
            flags.clear(flag);
        }
        outcome
    }
}

// ============================================================================
// Shared error slot
// ============================================================================

const ERROR_DIALOG: WidgetId = "error";

/// The last store failure, waiting to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSlot {
    error: Option<StoreError>,
}

impl ErrorSlot {
    pub fn set(&mut self, error: StoreError) {
        tracing::error!(%error, "store operation failed");
        self.error = Some(error);
    }

    pub fn is_set(&self) -> bool {
        self.error.is_some()
    }

    pub fn get(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn take(&mut self) -> Option<StoreError> {
        self.error.take()
    }

    /// Show the pending error as an acknowledge dialog.
    ///
    /// Returns `true` when a dialog was drawn this frame. The slot is cleared
    /// once the dialog is answered.
    pub fn present(&mut self, ui: &mut dyn Toolkit, bounds: Rect) -> bool {
        let Some(error) = &self.error else {
            return false;
        };
        let warning = Warning::acknowledge(
            ERROR_DIALOG,
            "Error",
            format!("The record store reported an error:\n{error}"),
        );
        if warning.show(ui, bounds) != DialogOutcome::Waiting {
            self.error = None;
        }
        true
    }
}

// ============================================================================
// Status line
// ============================================================================

/// Last informational message, shown in the overlay's status bar.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    message: Option<(DateTime<Local>, String)>,
}

impl StatusLine {
    pub fn set(&mut self, message: impl Into<String>) {
        self.message = Some((Local::now(), message.into()));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// Message without its timestamp.
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(_, text)| text.as_str())
    }

    pub fn text(&self) -> String {
        self.message
            .as_ref()
            .map(|(at, text)| format!("[{}] {text}", at.format("%H:%M:%S")))
            .unwrap_or_default()
    }
}
