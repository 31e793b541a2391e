//! The frame driver.
//!
//! Owns every screen for the life of the process, the overlay and the
//! shared state, and runs one frame at a time against any [`Toolkit`] and
//! [`RecordStore`]. Nothing here touches the terminal directly; the same
//! driver runs the real UI and the headless tests.

use super::dialog::{ErrorSlot, StatusLine};
use super::layout::WindowSize;
use super::overlay::{OverlayAction, PersistentOverlay};
use super::screens::default_screens;
use super::state::{can_transition, AppState};
use super::theme::ThemeName;
use super::toolkit::Toolkit;
use super::traits::{log_unimplemented, Screen, ScreenContext};
use crate::model::Session;
use crate::store::RecordStore;
use crate::utils::PasswordPolicy;
use indexmap::IndexMap;
use std::io;

pub struct FrameDriver {
    state: AppState,
    screens: IndexMap<AppState, Box<dyn Screen>>,
    overlay: PersistentOverlay,
    error: ErrorSlot,
    session: Session,
    status: StatusLine,
    /// Size the screens were last laid out for
    window: Option<WindowSize>,
    theme: ThemeName,
    theme_changed: bool,
    exit: bool,
    policy: PasswordPolicy,
    min_size: WindowSize,
}

impl FrameDriver {
    pub fn new(theme: ThemeName, policy: PasswordPolicy, min_size: WindowSize) -> Self {
        Self::with_screens(default_screens(), theme, policy, min_size)
    }

    /// Build a driver over a custom screen set. States without a screen
    /// are never entered.
    pub fn with_screens(
        screens: IndexMap<AppState, Box<dyn Screen>>,
        theme: ThemeName,
        policy: PasswordPolicy,
        min_size: WindowSize,
    ) -> Self {
        Self {
            state: AppState::default(),
            screens,
            overlay: PersistentOverlay::new(theme),
            error: ErrorSlot::default(),
            session: Session::new(),
            status: StatusLine::default(),
            window: None,
            theme,
            theme_changed: false,
            exit: false,
            policy,
            min_size,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn error(&self) -> &ErrorSlot {
        &self.error
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn theme(&self) -> ThemeName {
        self.theme
    }

    /// Whether the style was changed since the last call.
    pub fn take_theme_change(&mut self) -> bool {
        std::mem::take(&mut self.theme_changed)
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn screen(&self, state: AppState) -> Option<&dyn Screen> {
        self.screens.get(&state).map(|s| s.as_ref())
    }

    /// Run one frame.
    pub fn frame(&mut self, ui: &mut dyn Toolkit, store: &mut dyn RecordStore) -> io::Result<()> {
        ui.begin_frame()?;
        if ui.close_requested() {
            tracing::info!("close requested");
            self.exit = true;
            return ui.end_frame();
        }

        let resized = ui.take_resize();
        if let Some(window) = resized.or(self.window.is_none().then(|| ui.window_size())) {
            self.relayout(window);
        }
        ui.set_theme(self.theme.colors());

        let window = self.window.unwrap_or_else(|| ui.window_size());
        if !window.fits(self.min_size) {
            ui.size_warning(self.min_size);
            return ui.end_frame();
        }

        let from = self.state;
        let has_dialog = self.render_screen(ui, store, window);
        self.check_transition(from);

        let locked = has_dialog || self.error.is_set();
        match self.overlay.render(ui, &self.session, &self.status, locked) {
            OverlayAction::None => {}
            OverlayAction::Logout => self.logout(),
            OverlayAction::ThemeChanged(theme) => {
                tracing::info!(theme = theme.as_str(), "style changed");
                self.theme = theme;
                self.theme_changed = true;
            }
        }

        if let Err(err) = store.flush() {
            self.error.set(err);
        }
        ui.end_frame()
    }

    /// Returns whether the screen left a dialog pending.
    fn render_screen(
        &mut self,
        ui: &mut dyn Toolkit,
        store: &mut dyn RecordStore,
        window: WindowSize,
    ) -> bool {
        let Some(screen) = self.screens.get_mut(&self.state) else {
            tracing::warn!(state = ?self.state, "no screen registered");
            return false;
        };
        let mut ctx = ScreenContext {
            state: &mut self.state,
            error: &mut self.error,
            session: &mut self.session,
            status: &mut self.status,
            store,
            policy: self.policy,
            window,
            exit: &mut self.exit,
        };
        log_unimplemented(screen.render(ui, &mut ctx));
        screen.has_dialog()
    }

    /// Undo a state change the screen was not allowed to make.
    fn check_transition(&mut self, from: AppState) {
        let to = self.state;
        if to == from {
            return;
        }
        let allowed = can_transition(from, to)
            && self.screens.contains_key(&to)
            && (!to.requires_session() || self.session.is_logged_in())
            && (to != AppState::CreateUser || self.session.is_admin());
        if allowed {
            tracing::debug!(?from, ?to, "state changed");
        } else {
            tracing::warn!(?from, ?to, "transition refused");
            self.state = from;
        }
    }

    fn logout(&mut self) {
        tracing::info!(user = ?self.session.username(), "logout");
        if let Some(screen) = self.screens.get_mut(&self.state) {
            log_unimplemented(screen.cleanup());
        }
        self.session.clear();
        self.status.set("Signed out");
        self.state = AppState::Login;
    }

    fn relayout(&mut self, window: WindowSize) {
        tracing::debug!(%window, "layout recomputed");
        for screen in self.screens.values_mut() {
            log_unimplemented(screen.update_positions(window));
        }
        self.overlay.update_positions(window);
        self.window = Some(window);
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        for screen in self.screens.values_mut() {
            log_unimplemented(screen.cleanup());
        }
    }
}
