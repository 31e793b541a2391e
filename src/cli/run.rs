//! Run command handler.
//!
//! Opens the record store and hands the terminal to the screen framework.

use crate::config::AppConfig;
use crate::store::{FileStore, RecordStore};
use crate::tui::run_tui;
use anyhow::{Context, Result};

/// Run the interactive UI against the configured store.
pub fn run_app(config: &AppConfig) -> Result<()> {
    let path = config.store_path();
    let mut store = FileStore::open(&path)
        .with_context(|| format!("failed to open record store {}", path.display()))?;

    if store.users().count() == 0 {
        anyhow::bail!(
            "no user accounts in {}; create one first with `carebook add-user <name> --admin`",
            path.display()
        );
    }

    run_tui(config, &mut store).context("terminal UI failed")?;

    // The loop flushes every frame; this only matters if the last one failed.
    store.flush().context("failed to save records")?;
    Ok(())
}
