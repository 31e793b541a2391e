//! Terminal entry point.

use super::driver::FrameDriver;
use super::layout::WindowSize;
use super::theme::ThemeName;
use super::toolkit::{CrosstermEvents, TerminalToolkit};
use crate::config::{AppConfig, UiPreferences};
use crate::error::{CarebookError, Result};
use crate::store::RecordStore;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::backend::CrosstermBackend;
use std::io::{self, stdout};
use std::time::Duration;

/// Run the interactive UI until the user quits.
///
/// The saved style preference wins over the configured one. A style chosen
/// during the session is saved on exit.
pub fn run_tui(config: &AppConfig, store: &mut dyn RecordStore) -> Result<()> {
    let theme = UiPreferences::load()
        .and_then(|prefs| ThemeName::from_name(&prefs.theme))
        .or_else(|| ThemeName::from_name(&config.ui.theme))
        .unwrap_or_default();
    let min_size = WindowSize::new(config.ui.min_width, config.ui.min_height);
    let mut driver = FrameDriver::new(theme, config.password_policy(), min_size);

    let outcome = enter_terminal(config.ui.mouse_enabled).and_then(|out| {
        let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
        TerminalToolkit::new(CrosstermBackend::new(out), CrosstermEvents, tick_rate)
            .and_then(|mut ui| run_loop(&mut driver, &mut ui, store))
    });

    // Restore terminal even if setup or the loop failed
    let restored = disable_raw_mode().and_then(|()| {
        execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture, cursor::Show)
    });
    outcome.and(restored).map_err(CarebookError::Terminal)?;

    if driver.take_theme_change() {
        let prefs = UiPreferences {
            theme: driver.theme().as_str().to_string(),
        };
        if let Err(err) = prefs.save() {
            tracing::warn!(%err, "could not save UI preferences");
        }
    }
    Ok(())
}

fn enter_terminal(mouse: bool) -> io::Result<io::Stdout> {
    enable_raw_mode()?;
    let mut out = stdout();
    if mouse {
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(out, EnterAlternateScreen)?;
    }
    Ok(out)
}

fn run_loop(
    driver: &mut FrameDriver,
    ui: &mut TerminalToolkit<CrosstermBackend<io::Stdout>, CrosstermEvents>,
    store: &mut dyn RecordStore,
) -> io::Result<()> {
    tracing::info!("ui started");
    while !driver.should_exit() {
        driver.frame(ui, store)?;
    }
    tracing::info!("ui stopped");
    Ok(())
}
