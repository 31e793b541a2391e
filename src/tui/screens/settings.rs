//! Account settings: change the signed-in user's password.

use super::{apply_credential, defer};
use crate::model::User;
use crate::store::StoreStatus;
use crate::tui::buffer::TextField;
use crate::tui::dialog::{DialogOutcome, Warning};
use crate::tui::flags::FlagRegister;
use crate::tui::layout::{form_layout, FormLayout, WindowSize};
use crate::tui::pending::{PendingAction, PendingSlot};
use crate::tui::state::AppState;
use crate::tui::toolkit::{Tone, Toolkit};
use crate::tui::traits::{OpResult, Screen, ScreenContext};
use crate::utils::verify_password;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SettingsFlags: u8 {
        const REQUIRED_EMPTY = 1;
        const WRONG_PASSWORD = 1 << 1;
        const PASSWORD_MISMATCH = 1 << 2;
        const PASSWORD_TOO_SHORT = 1 << 3;
        const CONFIRM_CHANGE = 1 << 4;
        const OPERATION_DONE = 1 << 5;
    }
}

impl SettingsFlags {
    pub const PRIORITY: [Self; 5] = [
        Self::REQUIRED_EMPTY,
        Self::WRONG_PASSWORD,
        Self::PASSWORD_MISMATCH,
        Self::PASSWORD_TOO_SHORT,
        Self::CONFIRM_CHANGE,
    ];

    const VALIDATION: Self = Self::REQUIRED_EMPTY
        .union(Self::WRONG_PASSWORD)
        .union(Self::PASSWORD_MISMATCH)
        .union(Self::PASSWORD_TOO_SHORT);

    const DIALOGS: Self = Self::VALIDATION.union(Self::CONFIRM_CHANGE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Change,
    Back,
}

#[derive(Debug, Default)]
pub struct SettingsScreen {
    current: TextField,
    new_password: TextField,
    confirm: TextField,
    layout: FormLayout,
    flags: FlagRegister<SettingsFlags>,
    pending: PendingSlot<SettingsFlags, User>,
    pressed: Option<Action>,
    min_length: usize,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self {
            current: TextField::secret(64),
            new_password: TextField::secret(64),
            confirm: TextField::secret(64),
            ..Self::default()
        }
    }

    pub fn flags(&self) -> &FlagRegister<SettingsFlags> {
        &self.flags
    }

    fn change(&mut self, ctx: &mut ScreenContext<'_>) {
        if self.current.text().is_empty()
            || self.new_password.text().is_empty()
            || self.confirm.text().is_empty()
        {
            self.flags.set(SettingsFlags::REQUIRED_EMPTY);
            return;
        }
        let Some(username) = ctx.session.username().map(str::to_string) else {
            return;
        };

        let user = match ctx.store.users().read(&username) {
            Ok(user) => user,
            Err(err) if err.status() == StoreStatus::NotFound => {
                tracing::warn!(user = %username, "signed-in account no longer exists");
                self.flags.set(SettingsFlags::WRONG_PASSWORD);
                return;
            }
            Err(err) => {
                ctx.error.set(err);
                return;
            }
        };
        if !verify_password(self.current.text(), &user.salt, &user.password_hash) {
            tracing::warn!(user = %username, "password change rejected: wrong current password");
            self.flags.set(SettingsFlags::WRONG_PASSWORD);
            return;
        }
        if self.new_password.text() != self.confirm.text() {
            self.flags.set(SettingsFlags::PASSWORD_MISMATCH);
            return;
        }
        if !ctx.policy.accepts(self.new_password.text()) {
            self.min_length = ctx.policy.min_password_length;
            self.flags.set(SettingsFlags::PASSWORD_TOO_SHORT);
            return;
        }

        let credential = ctx.policy.derive(self.new_password.text());
        defer(
            &mut self.pending,
            &mut self.flags,
            SettingsFlags::CONFIRM_CHANGE,
            PendingAction::ResetCredential {
                id: username,
                credential,
            },
            ctx,
        );
    }

    fn execute(&mut self, action: PendingAction<User>, ctx: &mut ScreenContext<'_>) {
        let PendingAction::ResetCredential { id, credential } = action else {
            return;
        };
        match apply_credential(ctx.store, &id, &credential) {
            Ok(()) => {
                tracing::info!(user = %id, "password changed");
                ctx.set_status("Password changed");
                self.flags.set(SettingsFlags::OPERATION_DONE);
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn warning_for(&self, flag: SettingsFlags) -> Warning {
        if flag == SettingsFlags::REQUIRED_EMPTY {
            Warning::acknowledge("settings.required", "Missing input", "All three password fields are required.")
        } else if flag == SettingsFlags::WRONG_PASSWORD {
            Warning::acknowledge("settings.wrong", "Wrong password", "The current password is not correct.")
        } else if flag == SettingsFlags::PASSWORD_MISMATCH {
            Warning::acknowledge("settings.mismatch", "Passwords differ", "The new passwords do not match.")
        } else if flag == SettingsFlags::PASSWORD_TOO_SHORT {
            Warning::acknowledge(
                "settings.too_short",
                "Password too short",
                format!("Passwords need at least {} characters.", self.min_length),
            )
        } else {
            Warning::confirm(
                "settings.confirm",
                "Change password",
                "Replace your password? You will need the new one at the next login.",
            )
        }
    }
}

impl Screen for SettingsScreen {
    fn title(&self) -> &str {
        "Settings"
    }

    fn draw(&mut self, ui: &mut dyn Toolkit, _ctx: &mut ScreenContext<'_>) {
        ui.label(self.layout.title, " Settings", Tone::Title);
        ui.text_input("settings.current", self.layout.field(0), "Current password", &mut self.current);
        ui.text_input("settings.new", self.layout.field(1), "New password", &mut self.new_password);
        ui.text_input("settings.confirm_new", self.layout.field(2), "Repeat new password", &mut self.confirm);
        ui.label(
            self.layout.info,
            "Change the password of the signed-in account.\nThe colour style is chosen in the top bar.",
            Tone::Muted,
        );

        let change = ui.button("settings.change", self.layout.button(0), "Change password");
        let back = ui.button("settings.back", self.layout.button(1), "Back");
        self.pressed = if change {
            Some(Action::Change)
        } else if back {
            Some(Action::Back)
        } else {
            None
        };
    }

    fn handle_buttons(&mut self, ctx: &mut ScreenContext<'_>) -> OpResult {
        match self.pressed.take() {
            Some(Action::Change) => {
                self.flags.clear(SettingsFlags::VALIDATION);
                self.change(ctx);
            }
            Some(Action::Back) => {
                self.cleanup()?;
                ctx.navigate(AppState::MainMenu);
            }
            None => {}
        }
        Ok(())
    }

    fn handle_warning_msg(&mut self, ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>) -> OpResult {
        let Some(flag) = self.flags.first_active(&SettingsFlags::PRIORITY) else {
            return Ok(());
        };
        let warning = self.warning_for(flag);
        match warning.show_for(ui, self.layout.dialog, &mut self.flags, flag) {
            DialogOutcome::Waiting => {}
            DialogOutcome::Confirmed => {
                let action = self.pending.take_for(flag);
                self.execute(action, ctx);
            }
            DialogOutcome::Closed => self.pending.discard(flag),
        }
        Ok(())
    }

    fn update_positions(&mut self, window: WindowSize) -> OpResult {
        self.layout = form_layout(window, 3, 2);
        Ok(())
    }

    fn clear_fields(&mut self) -> OpResult {
        self.current.clear();
        self.new_password.clear();
        self.confirm.clear();
        Ok(())
    }

    /// Secrets never outlive a visit to the screen.
    fn cleanup(&mut self) -> OpResult {
        self.clear_fields()
    }

    fn has_dialog(&self) -> bool {
        self.flags.any_of(SettingsFlags::DIALOGS)
    }

    fn take_operation_done(&mut self) -> bool {
        self.flags.take(SettingsFlags::OPERATION_DONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntityStore;
    use crate::tui::screens::testing::{Harness, WINDOW};

    fn screen() -> SettingsScreen {
        let mut screen = SettingsScreen::new();
        screen.update_positions(WINDOW).unwrap();
        screen
    }

    fn type_change(h: &mut Harness, current: &str, new: &str, confirm: &str) {
        h.ui.type_into("settings.current", current)
            .type_into("settings.new", new)
            .type_into("settings.confirm_new", confirm)
            .press("settings.change");
    }

    #[test]
    fn test_change_password_after_confirm() {
        let mut h = Harness::new(AppState::Settings);
        h.login_as("nurse", "oldpass1", false);
        h.store.mark_clean();
        let mut screen = screen();

        type_change(&mut h, "oldpass1", "newpass1", "newpass1");
        h.frame(&mut screen);
        assert!(screen.flags().is_set(SettingsFlags::CONFIRM_CHANGE));
        assert!(!h.store.is_dirty());

        h.ui.answer(1);
        h.frame(&mut screen);
        let user = h.store.users.read("nurse").unwrap();
        assert!(verify_password("newpass1", &user.salt, &user.password_hash));
        assert!(screen.current.text().is_empty());
        assert_eq!(h.status.message(), Some("Password changed"));
    }

    #[test]
    fn test_wrong_current_password() {
        let mut h = Harness::new(AppState::Settings);
        h.login_as("nurse", "oldpass1", false);
        let mut screen = screen();

        type_change(&mut h, "guess", "newpass1", "newpass1");
        h.frame(&mut screen);
        assert_eq!(h.ui.dialogs()[0].id, Some("settings.wrong"));
    }

    #[test]
    fn test_cancel_keeps_old_password() {
        let mut h = Harness::new(AppState::Settings);
        h.login_as("nurse", "oldpass1", false);
        h.store.mark_clean();
        let mut screen = screen();

        type_change(&mut h, "oldpass1", "newpass1", "newpass1");
        h.frame(&mut screen);
        h.ui.answer(2);
        h.frame(&mut screen);
        assert!(!h.store.is_dirty());
        assert!(screen.flags().is_empty());
    }

    #[test]
    fn test_too_short() {
        let mut h = Harness::new(AppState::Settings);
        h.login_as("nurse", "oldpass1", false);
        let mut screen = screen();
        type_change(&mut h, "oldpass1", "abc", "abc");
        h.frame(&mut screen);
        assert!(h.dialog_text().unwrap().contains("at least 6"));
    }

    #[test]
    fn test_back_wipes_secrets() {
        let mut h = Harness::new(AppState::Settings);
        h.login_as("nurse", "oldpass1", false);
        let mut screen = screen();
        h.ui.type_into("settings.current", "oldpass1").press("settings.back");
        h.frame(&mut screen);
        assert_eq!(h.state, AppState::MainMenu);
        assert!(screen.current.text().is_empty());
        screen.cleanup().unwrap();
    }
}
