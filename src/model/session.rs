//! The logged-in identity shared between screens and the overlay.

use super::User;

/// Identity of the logged-in user as cached at login time.
///
/// `is_admin` is a cache only: privileged navigation re-checks the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub is_admin: bool,
}

/// Current session. Empty when nobody is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<SessionUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user`.
    pub fn login(&mut self, user: &User) {
        self.current = Some(SessionUser {
            username: user.username.clone(),
            is_admin: user.is_admin,
        });
    }

    /// Zero the session.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.current.as_ref().map(|u| u.username.as_str())
    }

    /// Cached admin flag; `false` when logged out.
    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Overwrite the cached admin flag after a store re-check.
    pub fn refresh_admin(&mut self, is_admin: bool) {
        if let Some(user) = self.current.as_mut() {
            user.is_admin = is_admin;
        }
    }
}
