//! The persistent overlay: session indicator, logout, style selector and
//! status bar, drawn on top of every screen.

use super::dialog::StatusLine;
use super::layout::{overlay_layout, OverlayLayout, WindowSize};
use super::theme::ThemeName;
use super::toolkit::{Tone, Toolkit};
use crate::model::Session;

/// What the user did with the overlay this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    None,
    Logout,
    ThemeChanged(ThemeName),
}

#[derive(Debug, Clone, Default)]
pub struct PersistentOverlay {
    layout: OverlayLayout,
    style: usize,
}

impl PersistentOverlay {
    pub fn new(theme: ThemeName) -> Self {
        Self {
            layout: OverlayLayout::default(),
            style: theme.index(),
        }
    }

    pub fn update_positions(&mut self, window: WindowSize) {
        self.layout = overlay_layout(window);
    }

    pub fn layout(&self) -> &OverlayLayout {
        &self.layout
    }

    pub fn theme(&self) -> ThemeName {
        ThemeName::from_index(self.style)
    }

    /// Draw the overlay. `locked` disables its controls while the active
    /// screen waits for a dialog answer.
    pub fn render(
        &mut self,
        ui: &mut dyn Toolkit,
        session: &Session,
        status: &StatusLine,
        locked: bool,
    ) -> OverlayAction {
        ui.set_locked(locked);

        let indicator = match session.user() {
            Some(user) if user.is_admin => format!(" {} (admin)", user.username),
            Some(user) => format!(" {}", user.username),
            None => " Not signed in".to_string(),
        };
        ui.label(self.layout.session, &indicator, Tone::Title);

        let mut action = OverlayAction::None;
        let names = ThemeName::ALL.map(ThemeName::as_str);
        if ui.dropdown("overlay.style", self.layout.style, &names, &mut self.style) {
            action = OverlayAction::ThemeChanged(self.theme());
        }

        if session.is_logged_in() && ui.button("overlay.logout", self.layout.logout, "Logout") {
            action = OverlayAction::Logout;
        }

        ui.set_locked(false);
        ui.status_bar(self.layout.status, &status.text());
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::tui::toolkit::{HeadlessToolkit, WidgetKind};

    fn logged_in() -> Session {
        let mut session = Session::new();
        session.login(&User {
            username: "matron".to_string(),
            salt: String::new(),
            password_hash: String::new(),
            is_admin: false,
        });
        session
    }

    fn frame(
        overlay: &mut PersistentOverlay,
        ui: &mut HeadlessToolkit,
        session: &Session,
        locked: bool,
    ) -> OverlayAction {
        ui.begin_frame().unwrap();
        let action = overlay.render(ui, session, &StatusLine::default(), locked);
        ui.end_frame().unwrap();
        action
    }

    #[test]
    fn test_logout_only_when_logged_in() {
        let mut overlay = PersistentOverlay::new(ThemeName::Dark);
        overlay.update_positions(WindowSize::new(80, 24));
        let mut ui = HeadlessToolkit::new(80, 24);

        ui.press("overlay.logout");
        assert_eq!(frame(&mut overlay, &mut ui, &Session::new(), false), OverlayAction::None);
        assert!(ui.find("overlay.logout").is_none());

        ui.press("overlay.logout");
        assert_eq!(frame(&mut overlay, &mut ui, &logged_in(), false), OverlayAction::Logout);
    }

    #[test]
    fn test_locked_overlay_ignores_logout() {
        let mut overlay = PersistentOverlay::new(ThemeName::Dark);
        let mut ui = HeadlessToolkit::new(80, 24);
        ui.press("overlay.logout");
        assert_eq!(frame(&mut overlay, &mut ui, &logged_in(), true), OverlayAction::None);
    }

    #[test]
    fn test_style_selection() {
        let mut overlay = PersistentOverlay::new(ThemeName::Dark);
        let mut ui = HeadlessToolkit::new(80, 24);
        ui.select("overlay.style", 2);
        assert_eq!(
            frame(&mut overlay, &mut ui, &Session::new(), false),
            OverlayAction::ThemeChanged(ThemeName::HighContrast)
        );
        assert_eq!(overlay.theme(), ThemeName::HighContrast);
    }

    #[test]
    fn test_status_bar_always_drawn() {
        let mut overlay = PersistentOverlay::new(ThemeName::Light);
        overlay.update_positions(WindowSize::new(80, 24));
        let mut ui = HeadlessToolkit::new(80, 24);
        frame(&mut overlay, &mut ui, &Session::new(), true);
        let bar = ui
            .last_frame()
            .iter()
            .find(|r| r.kind == WidgetKind::StatusBar)
            .unwrap();
        assert_eq!(bar.bounds.y, 23);
    }
}
