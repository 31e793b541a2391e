//! Main menu.

use crate::tui::dialog::Warning;
use crate::tui::flags::FlagRegister;
use crate::tui::layout::{menu_layout, MenuLayout, WindowSize};
use crate::tui::state::{verify_admin, AdminCheck, AppState};
use crate::tui::toolkit::{Tone, Toolkit, WidgetId};
use crate::tui::traits::{OpResult, Screen, ScreenContext};
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MenuFlags: u8 {
        const NOT_ADMIN = 1;
    }
}

const ENTRIES: [(WidgetId, &str); 5] = [
    ("menu.residents", "Residents"),
    ("menu.foods", "Foods"),
    ("menu.users", "Users"),
    ("menu.settings", "Settings"),
    ("menu.logout", "Logout"),
];

#[derive(Debug, Default)]
pub struct MainMenuScreen {
    layout: MenuLayout,
    flags: FlagRegister<MenuFlags>,
    pressed: Option<usize>,
    summary: String,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(&self) -> &FlagRegister<MenuFlags> {
        &self.flags
    }

    /// Navigate to the user screen only if the store still says admin.
    fn open_users(&mut self, ctx: &mut ScreenContext<'_>) {
        match verify_admin(ctx.store, ctx.session) {
            AdminCheck::Granted => ctx.navigate(AppState::CreateUser),
            AdminCheck::Revoked => {
                tracing::warn!(user = ?ctx.session.username(), "user management refused: not an administrator");
                ctx.session.refresh_admin(false);
                self.flags.set(MenuFlags::NOT_ADMIN);
            }
            AdminCheck::Failed(err) => ctx.error.set(err),
        }
    }
}

impl Screen for MainMenuScreen {
    fn title(&self) -> &str {
        "Main menu"
    }

    fn draw(&mut self, ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>) {
        let greeting = match ctx.session.username() {
            Some(name) => format!("Welcome, {name}"),
            None => "Welcome".to_string(),
        };
        ui.label(self.layout.title, &greeting, Tone::Title);

        let mut pressed = None;
        for (index, (id, label)) in ENTRIES.iter().enumerate() {
            if ui.button(*id, self.layout.button(index), label) && pressed.is_none() {
                pressed = Some(index);
            }
        }
        self.pressed = pressed;

        self.summary = format!(
            "{} residents, {} foods",
            ctx.store.residents().count(),
            ctx.store.foods().count()
        );
        ui.label(self.layout.summary, &self.summary, Tone::Muted);
    }

    fn handle_buttons(&mut self, ctx: &mut ScreenContext<'_>) -> OpResult {
        match self.pressed.take() {
            Some(0) => ctx.navigate(AppState::Residents),
            Some(1) => ctx.navigate(AppState::Foods),
            Some(2) => self.open_users(ctx),
            Some(3) => ctx.navigate(AppState::Settings),
            Some(4) => {
                tracing::info!(user = ?ctx.session.username(), "logout");
                ctx.session.clear();
                ctx.set_status("Signed out");
                ctx.navigate(AppState::Login);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_warning_msg(&mut self, ui: &mut dyn Toolkit, _ctx: &mut ScreenContext<'_>) -> OpResult {
        if !self.flags.is_set(MenuFlags::NOT_ADMIN) {
            return Ok(());
        }
        Warning::acknowledge(
            "menu.not_admin",
            "Not allowed",
            "User management requires an administrator account.",
        )
        .show_for(ui, self.layout.dialog, &mut self.flags, MenuFlags::NOT_ADMIN);
        Ok(())
    }

    fn update_positions(&mut self, window: WindowSize) -> OpResult {
        self.layout = menu_layout(window, ENTRIES.len());
        Ok(())
    }

    fn has_dialog(&self) -> bool {
        self.flags.is_set(MenuFlags::NOT_ADMIN)
    }
}
