//! In-memory record store for tests and simulation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{RecordStore, StoreError};
use crate::{
    env::{Environment, SystemEnv},
    item::{ItemId, VaultItem},
};

/// In-memory record store for tests and simulation.
///
/// Records are kept in insertion order; [`list`](RecordStore::list) reverses
/// them. Identifiers and timestamps come from the [`Environment`], so a
/// seeded [`SimEnv`](crate::SimEnv) makes runs reproducible.
#[derive(Debug, Clone)]
pub struct MemoryStore<E = SystemEnv> {
    env: E,
    records: Arc<Mutex<Vec<VaultItem>>>,
}

impl MemoryStore {
    /// Empty store using the system environment.
    pub fn new() -> Self {
        Self::with_env(SystemEnv::new())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> MemoryStore<E> {
    /// Empty store drawing identifiers and timestamps from `env`.
    pub fn with_env(env: E) -> Self {
        Self { env, records: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Insert a record verbatim, bypassing identifier assignment.
    ///
    /// Lets tests plant records written under another passphrase.
    pub fn insert(&self, item: VaultItem) {
        self.records().push(item);
    }

    fn records(&self) -> MutexGuard<'_, Vec<VaultItem>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Environment> RecordStore for MemoryStore<E> {
    fn list(&self) -> Result<Vec<VaultItem>, StoreError> {
        Ok(self.records().iter().rev().cloned().collect())
    }

    fn create(&self, title: &str, content: &str) -> Result<VaultItem, StoreError> {
        let item = VaultItem {
            id: ItemId::new(self.env.random_u128()),
            title: title.to_owned(),
            is_encrypted: true,
            content: content.to_owned(),
            created_at: self.env.wall_clock_secs(),
        };
        self.records().push(item.clone());
        Ok(item)
    }

    fn update(&self, id: ItemId, title: &str, content: &str) -> Result<VaultItem, StoreError> {
        let mut records = self.records();
        let item =
            records.iter_mut().find(|item| item.id == id).ok_or(StoreError::NotFound { id })?;
        title.clone_into(&mut item.title);
        content.clone_into(&mut item.content);
        Ok(item.clone())
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let mut records = self.records();
        let before = records.len();
        records.retain(|item| item.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound { id });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::env::SimEnv;

    #[test]
    fn list_is_newest_first() {
        let env = SimEnv::with_seed(7);
        let store = MemoryStore::with_env(env.clone());

        let first = store.create("first", "c1").unwrap();
        env.advance(Duration::from_secs(1));
        let second = store.create("second", "c2").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[test]
    fn create_assigns_id_and_timestamp() {
        let store = MemoryStore::with_env(SimEnv::with_seed(7));

        let item = store.create("t", "c").unwrap();

        assert!(item.is_encrypted);
        assert_eq!(item.created_at, 1_700_000_000);
        assert_ne!(item.id, store.create("t", "c").unwrap().id);
    }

    #[test]
    fn update_replaces_title_and_content() {
        let store = MemoryStore::with_env(SimEnv::default());
        let item = store.create("old", "c1").unwrap();

        let updated = store.update(item.id, "new", "c2").unwrap();

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.created_at, item.created_at);
        assert_eq!(updated.title, "new");
        assert_eq!(store.list().unwrap(), vec![updated]);
    }

    #[test]
    fn missing_records_are_not_found() {
        let store = MemoryStore::with_env(SimEnv::default());
        let id = ItemId::new(9);

        assert_eq!(store.update(id, "t", "c"), Err(StoreError::NotFound { id }));
        assert_eq!(store.delete(id), Err(StoreError::NotFound { id }));
    }

    #[test]
    fn delete_removes_record() {
        let store = MemoryStore::with_env(SimEnv::default());
        let item = store.create("t", "c").unwrap();

        store.delete(item.id).unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_records() {
        let store = MemoryStore::with_env(SimEnv::default());
        let clone = store.clone();

        clone.create("t", "c").unwrap();

        assert_eq!(store.len(), 1);
    }
}
