//! Add-user command handler.
//!
//! Bootstraps accounts from the command line, chiefly the first
//! administrator: the UI refuses to start without one.

use crate::config::AppConfig;
use crate::error::CarebookError;
use crate::model::User;
use crate::store::{FileStore, RecordStore, StoreStatus};
use anyhow::{Context, Result};

/// Create `username` in the configured store.
pub fn add_user(config: &AppConfig, username: &str, password: &str, is_admin: bool) -> Result<()> {
    let path = config.store_path();
    let mut store = FileStore::open(&path)
        .with_context(|| format!("failed to open record store {}", path.display()))?;
    create_user(&mut store, config, username, password, is_admin)?;
    store.flush().context("failed to save records")?;
    eprintln!("Created user {} in {}", username.to_lowercase(), path.display());
    Ok(())
}

/// Validate and insert one account.
pub(crate) fn create_user(
    store: &mut dyn RecordStore,
    config: &AppConfig,
    username: &str,
    password: &str,
    is_admin: bool,
) -> crate::Result<User> {
    let username = username.trim().to_lowercase();
    if !User::is_valid_username(&username) {
        return Err(CarebookError::validation(format!(
            "'{username}' is not a valid username (3 to 24 lower-case letters, digits, '.' or '_')"
        )));
    }
    let policy = config.password_policy();
    if !policy.accepts(password) {
        return Err(CarebookError::validation(format!(
            "password must be at least {} characters",
            policy.min_password_length
        )));
    }

    let credential = policy.derive(password);
    let user = User {
        username,
        salt: credential.salt,
        password_hash: credential.hash,
        is_admin,
    };
    match store.users().create(&user) {
        Ok(()) => {
            tracing::info!(user = %user.username, admin = is_admin, "user created from command line");
            Ok(user)
        }
        Err(err) if err.status() == StoreStatus::Conflict => Err(CarebookError::validation(
            format!("user '{}' already exists", user.username),
        )),
        Err(err) => Err(CarebookError::store("creating user", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntityStore, MemoryStore, StoreError, StoreResult};
    use crate::utils::verify_password;

    #[test]
    fn test_create_user_normalises_name() {
        let mut store = MemoryStore::default();
        let user = create_user(&mut store, &AppConfig::default(), " Matron ", "secret1", true)
            .unwrap();
        assert_eq!(user.username, "matron");
        let stored = store.users.read("matron").unwrap();
        assert!(stored.is_admin);
        assert!(verify_password("secret1", &stored.salt, &stored.password_hash));
    }

    #[test]
    fn test_create_user_rejects_duplicates_and_weak_passwords() {
        let mut store = MemoryStore::default();
        let config = AppConfig::default();
        create_user(&mut store, &config, "matron", "secret1", true).unwrap();

        let err = create_user(&mut store, &config, "matron", "secret2", false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let err = create_user(&mut store, &config, "nurse", "abc", false).unwrap_err();
        assert!(err.to_string().contains("at least"));

        let err = create_user(&mut store, &config, "x", "secret1", false).unwrap_err();
        assert!(matches!(err, CarebookError::Validation(_)));
    }

    /// Refuses every write.
    struct ReadOnly(MemoryStore);

    impl RecordStore for ReadOnly {
        fn residents(&mut self) -> &mut dyn EntityStore<crate::model::Resident> {
            &mut self.0.residents
        }

        fn foods(&mut self) -> &mut dyn EntityStore<crate::model::Food> {
            &mut self.0.foods
        }

        fn users(&mut self) -> &mut dyn EntityStore<User> {
            self
        }
    }

    impl EntityStore<User> for ReadOnly {
        fn create(&mut self, _record: &User) -> StoreResult<()> {
            Err(StoreError::failed("user", "read-only"))
        }

        fn read(&self, key: &str) -> StoreResult<User> {
            self.0.users.read(key)
        }

        fn update(&mut self, _record: &User) -> StoreResult<()> {
            Err(StoreError::failed("user", "read-only"))
        }

        fn delete(&mut self, _key: &str) -> StoreResult<()> {
            Err(StoreError::failed("user", "read-only"))
        }

        fn exists(&self, key: &str) -> bool {
            self.0.users.exists(key)
        }

        fn count(&self) -> usize {
            self.0.users.count()
        }

        fn all(&self) -> StoreResult<Vec<User>> {
            self.0.users.all()
        }
    }

    #[test]
    fn test_store_failure_carries_context() {
        let mut store = ReadOnly(MemoryStore::default());
        let err = create_user(&mut store, &AppConfig::default(), "matron", "secret1", true)
            .unwrap_err();
        match err {
            CarebookError::Store { context, source } => {
                assert_eq!(context, "creating user");
                assert!(source.to_string().contains("read-only"));
            }
            other => panic!("Expected Store error, got {other:?}"),
        }
    }
}
