//! JSON file persistence for the record store.

use super::{EntityStore, MemoryStore, RecordStore, StoreError, StoreResult};
use crate::error::{CarebookError, ErrorContext, Result};
use crate::model::{Food, Resident, User};
use std::path::{Path, PathBuf};

/// A [`MemoryStore`] mirrored to a JSON document on every flush.
///
/// Writes go to a sibling temporary file first and are renamed into place,
/// so a crash mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    tables: MemoryStore,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tables = if path.exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| CarebookError::io(&path, e))?;
            if content.trim().is_empty() {
                MemoryStore::new()
            } else {
                serde_json::from_str::<MemoryStore>(&content)
                    .with_context(|| format!("decoding {}", path.display()))?
            }
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| CarebookError::io(parent, e))?;
            }
            MemoryStore::new()
        };

        tracing::info!(
            path = %path.display(),
            residents = tables.residents.count(),
            foods = tables.foods.count(),
            users = tables.users.count(),
            "opened record store"
        );
        Ok(Self { path, tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_document(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.tables)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl RecordStore for FileStore {
    fn residents(&mut self) -> &mut dyn EntityStore<Resident> {
        &mut self.tables.residents
    }

    fn foods(&mut self) -> &mut dyn EntityStore<Food> {
        &mut self.tables.foods
    }

    fn users(&mut self) -> &mut dyn EntityStore<User> {
        &mut self.tables.users
    }

    fn flush(&mut self) -> StoreResult<()> {
        if !self.tables.is_dirty() {
            return Ok(());
        }
        self.write_document().map_err(|e| {
            StoreError::failed("store", format!("writing {}: {e}", self.path.display()))
        })?;
        self.tables.mark_clean();
        tracing::debug!(path = %self.path.display(), "flushed record store");
        Ok(())
    }
}
