//! The screen contract.
//!
//! Every screen implements [`Screen`]. The frame driver owns one boxed
//! screen per [`AppState`] for the whole process lifetime and, each frame,
//! calls `render` on the screen selected by the current state.
//!
//! # Frame flow
//!
//! `render` is a provided template:
//! 1. lock non-modal widgets if a dialog is pending
//! 2. `draw` the widgets and record this frame's interaction results
//! 3. `handle_buttons` acts on the first recorded press
//! 4. unlock, then show the shared error or run `handle_warning_msg`
//! 5. `clear_fields` if an operation completed
//!
//! Operations a screen does not support return [`NotImplemented`]; the
//! template and the driver log and carry on.

use super::buffer::TableBuffer;
use super::dialog::{ErrorSlot, StatusLine};
use super::layout::{dialog_bounds, WindowSize};
use super::state::AppState;
use super::toolkit::Toolkit;
use crate::model::Session;
use crate::store::RecordStore;
use crate::utils::PasswordPolicy;
use std::fmt;
use thiserror::Error;

/// The six screen operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Render,
    HandleButtons,
    HandleWarningMsg,
    UpdatePositions,
    ClearFields,
    Cleanup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Render => "render",
            Self::HandleButtons => "handle_buttons",
            Self::HandleWarningMsg => "handle_warning_msg",
            Self::UpdatePositions => "update_positions",
            Self::ClearFields => "clear_fields",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// A screen does not support an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{screen} does not implement {operation}")]
pub struct NotImplemented {
    pub screen: String,
    pub operation: Operation,
}

impl NotImplemented {
    pub fn new(screen: &str, operation: Operation) -> Self {
        Self {
            screen: screen.to_string(),
            operation,
        }
    }
}

/// Result of a screen operation.
pub type OpResult = Result<(), NotImplemented>;

/// Log an unsupported operation and carry on.
pub fn log_unimplemented(result: OpResult) {
    if let Err(err) = result {
        tracing::debug!(
            screen = %err.screen,
            operation = %err.operation,
            "operation not implemented"
        );
    }
}

/// Shared state handed to screen operations.
pub struct ScreenContext<'a> {
    pub state: &'a mut AppState,
    pub error: &'a mut ErrorSlot,
    pub session: &'a mut Session,
    pub status: &'a mut StatusLine,
    pub store: &'a mut dyn RecordStore,
    pub policy: PasswordPolicy,
    pub window: WindowSize,
    pub exit: &'a mut bool,
}

impl ScreenContext<'_> {
    /// Request a switch to `to` after this frame's render.
    pub fn navigate(&mut self, to: AppState) {
        tracing::debug!(from = ?self.state, ?to, "navigation requested");
        *self.state = to;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status.set(message);
    }

    pub fn request_exit(&mut self) {
        *self.exit = true;
    }
}

/// The polymorphic screen contract.
pub trait Screen {
    fn title(&self) -> &str;

    /// Draw this frame's widgets and record their interaction results for
    /// `handle_buttons`.
    fn draw(&mut self, ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>);

    /// Run one frame of the screen.
    fn render(&mut self, ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>) -> OpResult {
        let blocked = self.has_dialog() || ctx.error.is_set();
        ui.set_locked(blocked);
        self.draw(ui, ctx);
        let buttons = self.handle_buttons(ctx);
        ui.set_locked(false);
        log_unimplemented(buttons);

        if !ctx.error.present(ui, dialog_bounds(ctx.window)) {
            log_unimplemented(self.handle_warning_msg(ui, ctx));
        }

        if self.take_operation_done() {
            log_unimplemented(self.clear_fields());
        }
        Ok(())
    }

    /// Act on the first widget that reported an interaction this frame.
    fn handle_buttons(&mut self, _ctx: &mut ScreenContext<'_>) -> OpResult {
        Err(NotImplemented::new(self.title(), Operation::HandleButtons))
    }

    /// Show at most one dialog, for the highest-priority active condition.
    fn handle_warning_msg(
        &mut self,
        _ui: &mut dyn Toolkit,
        _ctx: &mut ScreenContext<'_>,
    ) -> OpResult {
        Err(NotImplemented::new(self.title(), Operation::HandleWarningMsg))
    }

    /// Recompute window-relative bounds. Called on resize only.
    fn update_positions(&mut self, _window: WindowSize) -> OpResult {
        Err(NotImplemented::new(self.title(), Operation::UpdatePositions))
    }

    /// Reset editable inputs.
    fn clear_fields(&mut self) -> OpResult {
        Err(NotImplemented::new(self.title(), Operation::ClearFields))
    }

    /// Release owned buffers. Must be safe to call repeatedly.
    fn cleanup(&mut self) -> OpResult {
        Err(NotImplemented::new(self.title(), Operation::Cleanup))
    }

    /// Whether a screen dialog is waiting for an answer.
    fn has_dialog(&self) -> bool {
        false
    }

    /// Consume the "operation done" condition.
    fn take_operation_done(&mut self) -> bool {
        false
    }

    /// The screen's bulk listing, if it keeps one.
    fn table(&self) -> Option<&TableBuffer> {
        None
    }
}
