//! User administration: create accounts, reset passwords, delete accounts.

use super::{apply_credential, defer};
use crate::model::User;
use crate::store::StoreStatus;
use crate::tui::buffer::{TableBuffer, TextField};
use crate::tui::dialog::{DialogOutcome, Warning};
use crate::tui::flags::FlagRegister;
use crate::tui::layout::{form_layout, FormLayout, WindowSize};
use crate::tui::pending::{PendingAction, PendingSlot};
use crate::tui::state::AppState;
use crate::tui::toolkit::{Tone, Toolkit, WidgetId};
use crate::tui::traits::{OpResult, Screen, ScreenContext};
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UserFlags: u16 {
        const REQUIRED_EMPTY = 1;
        const KEY_NOT_VALID = 1 << 1;
        const PASSWORD_MISMATCH = 1 << 2;
        const PASSWORD_TOO_SHORT = 1 << 3;
        const NOT_FOUND = 1 << 4;
        const ADMIN_PROTECTED = 1 << 5;
        const USER_EXISTS = 1 << 6;
        const CONFIRM_DELETE = 1 << 7;
        const OPERATION_DONE = 1 << 8;
    }
}

impl UserFlags {
    pub const PRIORITY: [Self; 8] = [
        Self::REQUIRED_EMPTY,
        Self::KEY_NOT_VALID,
        Self::PASSWORD_MISMATCH,
        Self::PASSWORD_TOO_SHORT,
        Self::NOT_FOUND,
        Self::ADMIN_PROTECTED,
        Self::USER_EXISTS,
        Self::CONFIRM_DELETE,
    ];

    const VALIDATION: Self = Self::REQUIRED_EMPTY
        .union(Self::KEY_NOT_VALID)
        .union(Self::PASSWORD_MISMATCH)
        .union(Self::PASSWORD_TOO_SHORT)
        .union(Self::NOT_FOUND)
        .union(Self::ADMIN_PROTECTED);

    const DIALOGS: Self = Self::VALIDATION
        .union(Self::USER_EXISTS)
        .union(Self::CONFIRM_DELETE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Delete,
    List,
    Back,
}

const BUTTONS: [(Action, WidgetId, &str); 4] = [
    (Action::Create, "users.create", "Create"),
    (Action::Delete, "users.delete", "Delete"),
    (Action::List, "users.list", "List users"),
    (Action::Back, "users.back", "Back"),
];

#[derive(Debug, Default)]
pub struct CreateUserScreen {
    username: TextField,
    password: TextField,
    confirm: TextField,
    is_admin: bool,
    layout: FormLayout,
    flags: FlagRegister<UserFlags>,
    pending: PendingSlot<UserFlags, User>,
    table: TableBuffer,
    scroll: u16,
    pressed: Option<Action>,
    subject: String,
}

impl CreateUserScreen {
    pub fn new() -> Self {
        Self {
            username: TextField::plain(24),
            password: TextField::secret(64),
            confirm: TextField::secret(64),
            ..Self::default()
        }
    }

    pub fn flags(&self) -> &FlagRegister<UserFlags> {
        &self.flags
    }

    pub fn pending(&self) -> &PendingSlot<UserFlags, User> {
        &self.pending
    }

    fn raise(&mut self, flag: UserFlags, subject: impl Into<String>) {
        self.subject = subject.into();
        self.flags.set(flag);
    }

    fn checked_username(&mut self) -> Option<String> {
        let username = self.username.value().to_lowercase();
        if username.is_empty() {
            self.raise(UserFlags::REQUIRED_EMPTY, "Username");
            return None;
        }
        if !User::is_valid_username(&username) {
            self.raise(UserFlags::KEY_NOT_VALID, username);
            return None;
        }
        Some(username)
    }

    fn create(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(username) = self.checked_username() else {
            return;
        };
        if self.password.text().is_empty() || self.confirm.text().is_empty() {
            self.raise(UserFlags::REQUIRED_EMPTY, "Password");
            return;
        }
        if self.password.text() != self.confirm.text() {
            self.flags.set(UserFlags::PASSWORD_MISMATCH);
            return;
        }
        if !ctx.policy.accepts(self.password.text()) {
            self.raise(
                UserFlags::PASSWORD_TOO_SHORT,
                ctx.policy.min_password_length.to_string(),
            );
            return;
        }

        let credential = ctx.policy.derive(self.password.text());
        let user = User {
            username: username.clone(),
            salt: credential.salt.clone(),
            password_hash: credential.hash.clone(),
            is_admin: self.is_admin,
        };
        match ctx.store.users().create(&user) {
            Ok(()) => {
                tracing::info!(user = %username, admin = user.is_admin, "user created");
                ctx.set_status(format!("Created user {username}"));
                self.refresh_table(ctx);
                self.flags.set(UserFlags::OPERATION_DONE);
            }
            Err(err) if err.status() == StoreStatus::Conflict => {
                defer(
                    &mut self.pending,
                    &mut self.flags,
                    UserFlags::USER_EXISTS,
                    PendingAction::ResetCredential {
                        id: username,
                        credential,
                    },
                    ctx,
                );
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn delete(&mut self, ctx: &mut ScreenContext<'_>) {
        let Some(username) = self.checked_username() else {
            return;
        };
        if ctx.session.username() == Some(username.as_str()) {
            self.raise(
                UserFlags::ADMIN_PROTECTED,
                "You cannot delete the account you are signed in with.",
            );
            return;
        }

        let users = ctx.store.users();
        let target = match users.read(&username) {
            Ok(user) => user,
            Err(err) if err.status() == StoreStatus::NotFound => {
                self.raise(UserFlags::NOT_FOUND, username);
                return;
            }
            Err(err) => {
                ctx.error.set(err);
                return;
            }
        };
        if target.is_admin {
            match users.all() {
                Ok(all) if all.iter().filter(|u| u.is_admin).count() <= 1 => {
                    self.raise(
                        UserFlags::ADMIN_PROTECTED,
                        "The last administrator account cannot be deleted.",
                    );
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    ctx.error.set(err);
                    return;
                }
            }
        }

        defer(
            &mut self.pending,
            &mut self.flags,
            UserFlags::CONFIRM_DELETE,
            PendingAction::Delete(username),
            ctx,
        );
    }

    fn list(&mut self, ctx: &mut ScreenContext<'_>) {
        match ctx.store.users().format_all() {
            Ok(listing) => {
                self.table.replace(listing);
                self.scroll = 0;
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn refresh_table(&mut self, ctx: &mut ScreenContext<'_>) {
        if self.table.is_held() {
            self.list(ctx);
        }
    }

    fn execute(&mut self, action: PendingAction<User>, ctx: &mut ScreenContext<'_>) {
        let result = match action {
            PendingAction::Delete(username) => ctx
                .store
                .users()
                .delete(&username)
                .map(|()| format!("Deleted user {username}")),
            PendingAction::ResetCredential { id, credential } => {
                apply_credential(ctx.store, &id, &credential)
                    .map(|()| format!("Password reset for {id}"))
            }
            PendingAction::Update(_) | PendingAction::None => return,
        };
        match result {
            Ok(message) => {
                tracing::info!("{message}");
                ctx.set_status(message);
                self.refresh_table(ctx);
                self.flags.set(UserFlags::OPERATION_DONE);
            }
            Err(err) => ctx.error.set(err),
        }
    }

    fn pending_user(&self) -> &str {
        match self.pending.action() {
            PendingAction::Delete(id) | PendingAction::ResetCredential { id, .. } => id.as_str(),
            PendingAction::Update(user) => user.username.as_str(),
            PendingAction::None => "",
        }
    }

    fn warning_for(&self, flag: UserFlags) -> Warning {
        if flag == UserFlags::REQUIRED_EMPTY {
            Warning::acknowledge(
                "users.required",
                "Missing input",
                format!("{} is required.", self.subject),
            )
        } else if flag == UserFlags::KEY_NOT_VALID {
            Warning::acknowledge(
                "users.invalid_name",
                "Invalid username",
                format!(
                    "'{}' is not a valid username.\nUse 3 to 24 lower-case letters, digits, '.' or '_'.",
                    self.subject
                ),
            )
        } else if flag == UserFlags::PASSWORD_MISMATCH {
            Warning::acknowledge(
                "users.mismatch",
                "Passwords differ",
                "The two passwords do not match.",
            )
        } else if flag == UserFlags::PASSWORD_TOO_SHORT {
            Warning::acknowledge(
                "users.too_short",
                "Password too short",
                format!("Passwords need at least {} characters.", self.subject),
            )
        } else if flag == UserFlags::NOT_FOUND {
            Warning::acknowledge(
                "users.not_found",
                "Not found",
                format!("No user named '{}' exists.", self.subject),
            )
        } else if flag == UserFlags::ADMIN_PROTECTED {
            Warning::acknowledge("users.protected", "Not allowed", self.subject.clone())
        } else if flag == UserFlags::USER_EXISTS {
            Warning::confirm(
                "users.exists",
                "User exists",
                format!(
                    "User '{}' already exists.\nReset their password to the one entered?",
                    self.pending_user()
                ),
            )
        } else {
            Warning::confirm(
                "users.confirm_delete",
                "Confirm delete",
                format!("Delete user '{}'?", self.pending_user()),
            )
        }
    }
}

impl Screen for CreateUserScreen {
    fn title(&self) -> &str {
        "Users"
    }

    fn draw(&mut self, ui: &mut dyn Toolkit, _ctx: &mut ScreenContext<'_>) {
        ui.label(self.layout.title, " Users", Tone::Title);
        ui.text_input("users.username", self.layout.field(0), "Username *", &mut self.username);
        ui.text_input("users.password", self.layout.field(1), "Password *", &mut self.password);
        ui.text_input("users.confirm", self.layout.field(2), "Confirm password *", &mut self.confirm);
        ui.checkbox("users.admin", self.layout.field(3), "Administrator", &mut self.is_admin);
        ui.label(
            self.layout.info,
            "Create adds an account.\nCreating an existing name offers a password reset.\nDelete needs only the username.",
            Tone::Muted,
        );

        match self.table.as_deref() {
            Some(listing) => {
                ui.scroll_panel("users.table", self.layout.table, "Accounts", listing, &mut self.scroll);
            }
            None => ui.label(self.layout.table, "Press List users to show every account.", Tone::Muted),
        }

        let mut pressed = None;
        for (index, (action, id, label)) in BUTTONS.iter().enumerate() {
            if ui.button(*id, self.layout.button(index), label) && pressed.is_none() {
                pressed = Some(*action);
            }
        }
        self.pressed = pressed;
    }

    fn handle_buttons(&mut self, ctx: &mut ScreenContext<'_>) -> OpResult {
        let Some(action) = self.pressed.take() else {
            return Ok(());
        };
        self.flags.clear(UserFlags::VALIDATION);
        match action {
            Action::Create => self.create(ctx),
            Action::Delete => self.delete(ctx),
            Action::List => self.list(ctx),
            Action::Back => {
                self.cleanup()?;
                ctx.navigate(AppState::MainMenu);
            }
        }
        Ok(())
    }

    fn handle_warning_msg(&mut self, ui: &mut dyn Toolkit, ctx: &mut ScreenContext<'_>) -> OpResult {
        let Some(flag) = self.flags.first_active(&UserFlags::PRIORITY) else {
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
        self.layout = form_layout(window, 4, BUTTONS.len());
        Ok(())
    }

    fn clear_fields(&mut self) -> OpResult {
        self.username.clear();
        self.password.clear();
        self.confirm.clear();
        self.is_admin = false;
        Ok(())
    }

    fn cleanup(&mut self) -> OpResult {
        self.table.release();
        self.scroll = 0;
        self.password.clear();
        self.confirm.clear();
        Ok(())
    }

    fn has_dialog(&self) -> bool {
        self.flags.any_of(UserFlags::DIALOGS)
    }

    fn take_operation_done(&mut self) -> bool {
        self.flags.take(UserFlags::OPERATION_DONE)
    }

    fn table(&self) -> Option<&TableBuffer> {
        Some(&self.table)
    }
}
