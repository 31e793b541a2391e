//! Record store abstractions.
//!
//! Screens only ever see the two traits in this module. Each entity gets an
//! [`EntityStore`] with the same seven operations; a [`RecordStore`] bundles
//! the three entity stores and knows how to persist them.
//!
//! Screens never inspect a failure beyond its [`StoreStatus`]: `NotFound` and
//! `Conflict` drive dialogs, anything else goes to the shared error slot.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::{MemoryStore, MemoryTable};

use crate::model::{format_table, Food, Record, Resident, User};
use thiserror::Error;

/// Failure of a single store operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("no {entity} with key '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("a {entity} with key '{key}' already exists")]
    Conflict { entity: &'static str, key: String },

    #[error("{entity} store failure: {message}")]
    Failed {
        entity: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn not_found<R: Record>(key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: R::ENTITY,
            key: key.into(),
        }
    }

    pub fn conflict<R: Record>(key: impl Into<String>) -> Self {
        Self::Conflict {
            entity: R::ENTITY,
            key: key.into(),
        }
    }

    pub fn failed(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            entity,
            message: message.into(),
        }
    }

    /// Result discriminant of this failure.
    pub const fn status(&self) -> StoreStatus {
        match self {
            Self::NotFound { .. } => StoreStatus::NotFound,
            Self::Conflict { .. } => StoreStatus::Conflict,
            Self::Failed { .. } => StoreStatus::Error,
        }
    }
}

/// Result type of every store operation.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Discriminant of a store call outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreStatus {
    Ok,
    NotFound,
    Conflict,
    Error,
}

impl StoreStatus {
    pub fn of<T>(result: &StoreResult<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.status(),
        }
    }
}

/// CRUD operations over one entity type.
pub trait EntityStore<R: Record> {
    /// Insert a new record. Fails with `Conflict` if the key is taken.
    fn create(&mut self, record: &R) -> StoreResult<()>;

    /// Fetch a copy of the record stored under `key`.
    fn read(&self, key: &str) -> StoreResult<R>;

    /// Replace an existing record. Fails with `NotFound` if absent.
    fn update(&mut self, record: &R) -> StoreResult<()>;

    /// Remove the record stored under `key`.
    fn delete(&mut self, key: &str) -> StoreResult<()>;

    fn exists(&self, key: &str) -> bool;

    fn count(&self) -> usize;

    /// All records in insertion order.
    fn all(&self) -> StoreResult<Vec<R>>;

    /// Bulk listing of all records as display text.
    fn format_all(&self) -> StoreResult<String> {
        let records = self.all()?;
        Ok(format_table(&records))
    }
}

/// The application's persistent store: one entity store per record type.
pub trait RecordStore {
    fn residents(&mut self) -> &mut dyn EntityStore<Resident>;

    fn foods(&mut self) -> &mut dyn EntityStore<Food>;

    fn users(&mut self) -> &mut dyn EntityStore<User>;

    /// Persist pending changes. In-memory stores have nothing to do.
    fn flush(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_results() {
        let ok: StoreResult<()> = Ok(());
        assert_eq!(StoreStatus::of(&ok), StoreStatus::Ok);

        let missing: StoreResult<()> = Err(StoreError::not_found::<Food>("SOUP"));
        assert_eq!(StoreStatus::of(&missing), StoreStatus::NotFound);

        let taken: StoreResult<()> = Err(StoreError::conflict::<Food>("SOUP"));
        assert_eq!(StoreStatus::of(&taken), StoreStatus::Conflict);

        let broken: StoreResult<()> = Err(StoreError::failed("food", "disk full"));
        assert_eq!(StoreStatus::of(&broken), StoreStatus::Error);
    }

    #[test]
    fn test_error_messages_name_the_key() {
        let err = StoreError::conflict::<Resident>("R-7");
        assert_eq!(err.to_string(), "a resident with key 'R-7' already exists");
    }
}
