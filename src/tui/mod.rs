//! Immediate-mode screen framework and the terminal UI built on it.
//!
//! # Architecture
//!
//! - [`toolkit`]: the per-frame widget surface, terminal and headless
//! - [`traits`]: the [`Screen`] contract and its frame template
//! - [`flags`], [`dialog`], [`pending`]: per-screen conditions, the
//!   dialogs they raise and the actions waiting on them
//! - [`screens`]: the concrete screens, one per [`AppState`]
//! - [`driver`]: runs frames, relayouts on resize, guards transitions
//!   and draws the persistent overlay

pub mod buffer;
pub mod dialog;
pub mod driver;
pub mod flags;
pub mod layout;
pub mod overlay;
pub mod pending;
pub mod screens;
pub mod state;
pub mod theme;
pub mod toolkit;
pub mod traits;
mod ui;

pub use buffer::{InputKind, TableBuffer, TextField};
pub use dialog::{DialogKind, DialogOutcome, DialogResponse, ErrorSlot, StatusLine, Warning};
pub use driver::FrameDriver;
pub use flags::FlagRegister;
pub use layout::WindowSize;
pub use overlay::{OverlayAction, PersistentOverlay};
pub use pending::{PendingAction, PendingSlot};
pub use state::{AdminCheck, AppState, can_transition, verify_admin};
pub use theme::{ColorScheme, ThemeName};
pub use toolkit::{HeadlessToolkit, TerminalToolkit, Toolkit, WidgetId};
pub use traits::{NotImplemented, OpResult, Operation, Screen, ScreenContext};
pub use ui::run_tui;
