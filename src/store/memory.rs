//! In-memory tables.

use super::{EntityStore, RecordStore, StoreError, StoreResult};
use crate::model::{Food, Record, Resident, User};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entity table keyed by record key, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent, bound(deserialize = ""))]
pub struct MemoryTable<R: Record> {
    rows: IndexMap<String, R>,
    #[serde(skip)]
    dirty: bool,
}

impl<R: Record> Default for MemoryTable<R> {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
            dirty: false,
        }
    }
}

impl<R: Record> MemoryTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the table changed since the last [`mark_clean`](Self::mark_clean).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

impl<R: Record> EntityStore<R> for MemoryTable<R> {
    fn create(&mut self, record: &R) -> StoreResult<()> {
        let key = record.key();
        if self.rows.contains_key(key) {
            return Err(StoreError::conflict::<R>(key));
        }
        self.rows.insert(key.to_string(), record.clone());
        self.dirty = true;
        Ok(())
    }

    fn read(&self, key: &str) -> StoreResult<R> {
        self.rows
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<R>(key))
    }

    fn update(&mut self, record: &R) -> StoreResult<()> {
        let slot = self
            .rows
            .get_mut(record.key())
            .ok_or_else(|| StoreError::not_found::<R>(record.key()))?;
        *slot = record.clone();
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        self.rows
            .shift_remove(key)
            .ok_or_else(|| StoreError::not_found::<R>(key))?;
        self.dirty = true;
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    fn count(&self) -> usize {
        self.rows.len()
    }

    fn all(&self) -> StoreResult<Vec<R>> {
        Ok(self.rows.values().cloned().collect())
    }
}

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    pub residents: MemoryTable<Resident>,
    pub foods: MemoryTable<Food>,
    pub users: MemoryTable<User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.residents.is_dirty() || self.foods.is_dirty() || self.users.is_dirty()
    }

    pub fn mark_clean(&mut self) {
        self.residents.mark_clean();
        self.foods.mark_clean();
        self.users.mark_clean();
    }
}

impl RecordStore for MemoryStore {
    fn residents(&mut self) -> &mut dyn EntityStore<Resident> {
        &mut self.residents
    }

    fn foods(&mut self) -> &mut dyn EntityStore<Food> {
        &mut self.foods
    }

    fn users(&mut self) -> &mut dyn EntityStore<User> {
        &mut self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreStatus;

    fn food(code: &str, calories: u32) -> Food {
        Food {
            code: code.to_string(),
            name: "Soup".to_string(),
            calories,
            allergens: String::new(),
        }
    }

    #[test]
    fn test_create_then_conflict() {
        let mut table = MemoryTable::new();
        assert!(table.create(&food("SOUP", 120)).is_ok());
        let again = table.create(&food("SOUP", 150));
        assert_eq!(StoreStatus::of(&again), StoreStatus::Conflict);
        assert_eq!(table.read("SOUP").unwrap().calories, 120);
    }

    #[test]
    fn test_update_requires_existing() {
        let mut table = MemoryTable::new();
        let missing = table.update(&food("SOUP", 1));
        assert_eq!(StoreStatus::of(&missing), StoreStatus::NotFound);

        table.create(&food("SOUP", 1)).unwrap();
        table.update(&food("SOUP", 2)).unwrap();
        assert_eq!(table.read("SOUP").unwrap().calories, 2);
    }

    #[test]
    fn test_delete_and_count() {
        let mut table = MemoryTable::new();
        table.create(&food("A", 1)).unwrap();
        table.create(&food("B", 1)).unwrap();
        assert_eq!(table.count(), 2);

        table.delete("A").unwrap();
        assert!(!table.exists("A"));
        assert_eq!(table.count(), 1);
        assert!(table.delete("A").is_err());
    }

    #[test]
    fn test_all_keeps_insertion_order() {
        let mut table = MemoryTable::new();
        for code in ["C", "A", "B"] {
            table.create(&food(code, 1)).unwrap();
        }
        let codes: Vec<_> = table.all().unwrap().into_iter().map(|f| f.code).collect();
        assert_eq!(codes, ["C", "A", "B"]);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut store = MemoryStore::new();
        assert!(!store.is_dirty());
        store.foods().create(&food("A", 1)).unwrap();
        assert!(store.is_dirty());
        store.mark_clean();
        assert!(!store.is_dirty());

        let _ = store.foods().read("A");
        assert!(!store.is_dirty(), "reads never dirty the store");
    }
}
