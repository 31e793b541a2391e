//! Application state machine.

use crate::model::Session;
use crate::store::{RecordStore, StoreError, StoreStatus};

/// The screen selected for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Login,
    MainMenu,
    Residents,
    Foods,
    CreateUser,
    Settings,
}

impl AppState {
    pub const ALL: [Self; 6] = [
        Self::Login,
        Self::MainMenu,
        Self::Residents,
        Self::Foods,
        Self::CreateUser,
        Self::Settings,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::MainMenu => "Main menu",
            Self::Residents => "Residents",
            Self::Foods => "Foods",
            Self::CreateUser => "Users",
            Self::Settings => "Settings",
        }
    }

    /// Whether the screen is reachable only while logged in.
    pub const fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// Whether a screen may move the application from `from` to `to`.
///
/// Staying put is always allowed. Logging out to [`AppState::Login`] is
/// allowed from anywhere.
pub const fn can_transition(from: AppState, to: AppState) -> bool {
    use AppState::{CreateUser, Foods, Login, MainMenu, Residents, Settings};
    matches!(
        (from, to),
        (Login, Login)
            | (MainMenu, MainMenu)
            | (Residents, Residents)
            | (Foods, Foods)
            | (CreateUser, CreateUser)
            | (Settings, Settings)
            | (_, Login)
            | (Login, MainMenu)
            | (MainMenu, Residents | Foods | CreateUser | Settings)
            | (Residents | Foods | CreateUser | Settings, MainMenu)
    )
}

/// Outcome of re-checking the session's admin rights against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCheck {
    Granted,
    /// The stored account is not (or no longer) an administrator
    Revoked,
    Failed(StoreError),
}

/// Look the session user up in the store instead of trusting the cached flag.
pub fn verify_admin(store: &mut dyn RecordStore, session: &Session) -> AdminCheck {
    let Some(username) = session.username() else {
        return AdminCheck::Revoked;
    };
    match store.users().read(username) {
        Ok(user) if user.is_admin => AdminCheck::Granted,
        Ok(_) => AdminCheck::Revoked,
        Err(err) if err.status() == StoreStatus::NotFound => AdminCheck::Revoked,
        Err(err) => AdminCheck::Failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::store::{EntityStore, MemoryStore};

    fn user(name: &str, is_admin: bool) -> User {
        User {
            username: name.to_string(),
            salt: "00".to_string(),
            password_hash: "ff".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_transition_table() {
        use AppState::*;
        assert!(can_transition(Login, MainMenu));
        assert!(!can_transition(Login, Residents));
        assert!(can_transition(MainMenu, CreateUser));
        assert!(can_transition(Foods, MainMenu));
        assert!(!can_transition(Foods, Residents));
        assert!(!can_transition(Settings, CreateUser));
        for state in AppState::ALL {
            assert!(can_transition(state, state));
            assert!(can_transition(state, Login));
        }
    }

    #[test]
    fn test_verify_admin_reads_store() {
        let mut store = MemoryStore::default();
        store.users.create(&user("boss", true)).unwrap();
        let mut session = Session::new();
        session.login(&user("boss", true));
        assert_eq!(verify_admin(&mut store, &session), AdminCheck::Granted);

        store.users.update(&user("boss", false)).unwrap();
        assert_eq!(verify_admin(&mut store, &session), AdminCheck::Revoked);
    }

    #[test]
    fn test_verify_admin_without_session() {
        let mut store = MemoryStore::default();
        assert_eq!(
            verify_admin(&mut store, &Session::new()),
            AdminCheck::Revoked
        );
    }

    #[test]
    fn test_verify_admin_deleted_account() {
        let mut store = MemoryStore::default();
        let mut session = Session::new();
        session.login(&user("ghost", true));
        assert_eq!(verify_admin(&mut store, &session), AdminCheck::Revoked);
    }
}
