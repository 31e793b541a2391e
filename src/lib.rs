//! **A terminal record desk for a care home.**
//!
//! `carebook` keeps residents, menu items and staff accounts in a local
//! record store and manages them through an immediate-mode terminal UI.
//!
//! ## Core Concepts & Modules
//!
//! - **[`tui`]**: the screen framework. Every frame the [`FrameDriver`]
//!   asks the active [`Screen`] to redraw itself through a
//!   [`Toolkit`](tui::Toolkit); screens never hold widget objects between
//!   frames. Conditions found while handling a button become bits in a
//!   per-screen [`FlagRegister`](tui::FlagRegister) and are reported one
//!   dialog at a time; operations that need confirmation wait in a
//!   [`PendingSlot`](tui::PendingSlot) until the user answers.
//! - **[`store`]**: the [`RecordStore`] trait with in-memory and JSON file
//!   implementations.
//! - **[`model`]**: [`Resident`], [`Food`] and [`User`] records and the
//!   login [`Session`].
//! - **[`config`]**: YAML configuration, discovery and validation.
//!
//! ## Driving the framework without a terminal
//!
//! The same driver runs against [`HeadlessToolkit`](tui::HeadlessToolkit),
//! which takes scripted input and records every widget drawn:
//!
//! ```
//! use carebook::store::MemoryStore;
//! use carebook::tui::{AppState, FrameDriver, HeadlessToolkit, ThemeName, WindowSize};
//! use carebook::utils::PasswordPolicy;
//!
//! let mut driver = FrameDriver::new(
//!     ThemeName::Dark,
//!     PasswordPolicy::default(),
//!     WindowSize::new(60, 20),
//! );
//! let mut ui = HeadlessToolkit::new(80, 24);
//! let mut store = MemoryStore::default();
//!
//! ui.press("login.submit");
//! driver.frame(&mut ui, &mut store).unwrap();
//!
//! assert_eq!(driver.state(), AppState::Login);
//! assert_eq!(ui.dialogs().len(), 1);
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Layout math narrows usize counts to u16 terminal cells
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod tui;
pub mod utils;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{CarebookError, ErrorContext, Result};
pub use model::{Food, Record, Resident, Session, User};
pub use store::{EntityStore, FileStore, MemoryStore, RecordStore, StoreError, StoreStatus};
pub use tui::{AppState, FrameDriver, Screen};
