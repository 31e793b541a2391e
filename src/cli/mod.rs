//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the logic for a specific CLI subcommand.

mod run;
mod user;

pub use run::run_app;
pub use user::add_user;
