//! Login screen.

use crate::store::StoreStatus;
use crate::tui::buffer::TextField;
use crate::tui::dialog::{DialogOutcome, Warning};
use crate::tui::flags::FlagRegister;
use crate::tui::layout::{form_layout, FormLayout, WindowSize};
use crate::tui::state::AppState;
use crate::tui::toolkit::{Tone, Toolkit};
use crate::tui::traits::{OpResult, Screen, ScreenContext};
use crate::utils::verify_password;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LoginFlags: u8 {
        const REQUIRED_EMPTY = 1;
        const INVALID_CREDENTIALS = 1 << 1;
        const OPERATION_DONE = 1 << 2;
    }
}

const WARNINGS: [LoginFlags; 2] = [LoginFlags::REQUIRED_EMPTY, LoginFlags::INVALID_CREDENTIALS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Button {
    Login,
    Quit,
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    username: TextField,
    password: TextField,
    layout: FormLayout,
    flags: FlagRegister<LoginFlags>,
    pressed: Option<Button>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            username: TextField::plain(24),
            password: TextField::secret(64),
            ..Self::default()
        }
    }

    pub fn flags(&self) -> &FlagRegister<LoginFlags> {
        &self.flags
    }

    fn attempt_login(&mut self, ctx: &mut ScreenContext<'_>) {
        self.flags
            .clear(LoginFlags::REQUIRED_EMPTY | LoginFlags::INVALID_CREDENTIALS);
        if self.username.is_blank() || self.password.text().is_empty() {
            self.flags.set(LoginFlags::REQUIRED_EMPTY);
            return;
        }

        let username = self.username.value().to_lowercase();
        match ctx.store.users().read(&username) {
            Ok(user) if verify_password(self.password.text(), &user.salt, &user.password_hash) => {
                tracing::info!(user = %user.username, admin = user.is_admin, "login");
                ctx.session.login(&user);
                ctx.set_status(format!("Signed in as {}", user.username));
                ctx.navigate(AppState::MainMenu);
                self.flags.set(LoginFlags::OPERATION_DONE);
            }
            Ok(_) => {
                tracing::warn!(user = %username, "login rejected: wrong password");
                self.flags.set(LoginFlags::INVALID_CREDENTIALS);
            }
            Err(err) if err.status() == StoreStatus::NotFound => {
                tracing::warn!(user = %username, "login rejected: unknown user");
                self.flags.set(LoginFlags::INVALID_CREDENTIALS);
            }
            Err(err) => ctx.error.set(err),
        }
    }
}

impl Screen for LoginScreen {
    fn title(&self) -> &str {
        "Login"
    }

    fn draw(&mut self, ui: &mut dyn Toolkit, _ctx: &mut ScreenContext<'_>) {
        ui.label(self.layout.title, " Sign in", Tone::Title);
        ui.text_input("login.username", self.layout.field(0), "Username", &mut self.username);
        ui.text_input("login.password", self.layout.field(1), "Password", &mut self.password);
        ui.label(
            self.layout.info,
            "Enter your username and password.\nTab moves between fields.",
            Tone::Muted,
        );

        let login = ui.button("login.submit", self.layout.button(0), "Login");
        let quit = ui.button("login.quit", self.layout.button(1), "Quit");
        self.pressed = if login {
            Some(Button::Login)
        } else if quit {
            Some(Button::Quit)
        } else {
            None
        };
    }

    fn handle_buttons(&mut self, ctx: &mut ScreenContext<'_>) -> OpResult {
        match self.pressed.take() {
            Some(Button::Login) => self.attempt_login(ctx),
            Some(Button::Quit) => ctx.request_exit(),
            None => {}
        }
        Ok(())
    }

    fn handle_warning_msg(&mut self, ui: &mut dyn Toolkit, _ctx: &mut ScreenContext<'_>) -> OpResult {
        let Some(flag) = self.flags.first_active(&WARNINGS) else {
            return Ok(());
        };
        let warning = if flag == LoginFlags::REQUIRED_EMPTY {
            Warning::acknowledge(
                "login.required",
                "Missing input",
                "Username and password are both required.",
            )
        } else {
            Warning::acknowledge(
                "login.invalid",
                "Login failed",
                "Unknown username or wrong password.",
            )
        };
        if warning.show_for(ui, self.layout.dialog, &mut self.flags, flag) != DialogOutcome::Waiting {
            self.password.clear();
        }
        Ok(())
    }

    fn update_positions(&mut self, window: WindowSize) -> OpResult {
        self.layout = form_layout(window, 2, 2);
        Ok(())
    }

    fn clear_fields(&mut self) -> OpResult {
        self.username.clear();
        self.password.clear();
        Ok(())
    }

    fn cleanup(&mut self) -> OpResult {
        self.password.clear();
        Ok(())
    }

    fn has_dialog(&self) -> bool {
        self.flags.any_of(LoginFlags::REQUIRED_EMPTY | LoginFlags::INVALID_CREDENTIALS)
    }

    fn take_operation_done(&mut self) -> bool {
        self.flags.take(LoginFlags::OPERATION_DONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::screens::testing::{Harness, WINDOW};

    fn screen() -> LoginScreen {
        let mut screen = LoginScreen::new();
        screen.update_positions(WINDOW).unwrap();
        screen
    }

    #[test]
    fn test_successful_login() {
        let mut h = Harness::new(AppState::Login);
        h.add_user("matron", "secret1", true);
        let mut screen = screen();

        h.ui.type_into("login.username", "matron")
            .type_into("login.password", "secret1")
            .press("login.submit");
        h.frame(&mut screen);

        assert_eq!(h.state, AppState::MainMenu);
        assert_eq!(h.session.username(), Some("matron"));
        assert!(h.session.is_admin());
        assert!(screen.username.is_blank(), "fields cleared after login");
        assert!(h.ui.dialogs().is_empty());
    }

    #[test]
    fn test_wrong_password() {
        let mut h = Harness::new(AppState::Login);
        h.add_user("matron", "secret1", false);
        let mut screen = screen();

        h.ui.type_into("login.username", "matron")
            .type_into("login.password", "nope")
            .press("login.submit");
        h.frame(&mut screen);

        assert_eq!(h.state, AppState::Login);
        assert!(!h.session.is_logged_in());
        assert!(h.dialog_text().unwrap().contains("wrong password"));

        h.ui.answer(1);
        h.frame(&mut screen);
        assert!(screen.flags().is_empty());
        assert!(screen.password.text().is_empty());
        assert_eq!(screen.username.text(), "matron");
    }

    #[test]
    fn test_unknown_user_same_message() {
        let mut h = Harness::new(AppState::Login);
        let mut screen = screen();
        h.ui.type_into("login.username", "ghost")
            .type_into("login.password", "whatever")
            .press("login.submit");
        h.frame(&mut screen);
        assert!(screen.flags().is_set(LoginFlags::INVALID_CREDENTIALS));
    }

    #[test]
    fn test_required_fields() {
        let mut h = Harness::new(AppState::Login);
        let mut screen = screen();
        h.ui.type_into("login.username", "matron").press("login.submit");
        h.frame(&mut screen);
        assert!(screen.flags().is_set(LoginFlags::REQUIRED_EMPTY));
        assert!(h.dialog_text().unwrap().contains("required"));
    }

    #[test]
    fn test_password_is_masked() {
        let mut h = Harness::new(AppState::Login);
        let mut screen = screen();
        h.ui.type_into("login.password", "secret1");
        h.frame(&mut screen);
        assert_eq!(h.field_text("login.password"), "*******");
        assert_eq!(screen.password.text(), "secret1");
    }

    #[test]
    fn test_quit() {
        let mut h = Harness::new(AppState::Login);
        let mut screen = screen();
        h.ui.press("login.quit");
        h.frame(&mut screen);
        assert!(h.exit);
    }
}
