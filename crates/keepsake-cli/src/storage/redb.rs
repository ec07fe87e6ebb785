//! Redb-backed durable record and settings store.
//!
//! Uses Redb's ACID transactions with Copy-on-Write for crash safety.

use std::{fmt::Display, path::Path, sync::Arc};

use keepsake_core::{
    Environment, ItemId, RecordStore, SettingsStore, StoreError, SystemEnv, VaultItem,
};
use redb::{Database, ReadableTable, TableDefinition};

/// Table: items
/// Key: insertion sequence number (newest is largest)
/// Value: CBOR-encoded `VaultItem`
const ITEMS: TableDefinition<u64, &[u8]> = TableDefinition::new("items");

/// Table: settings
/// Key: setting name
/// Value: setting value as stored by the caller
const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Durable store backed by Redb.
///
/// Thread-safe through Redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStore<E = SystemEnv> {
    db: Arc<Database>,
    env: E,
}

impl RedbStore {
    /// Open or create a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_env(path, SystemEnv::new())
    }
}

impl<E: Environment> RedbStore<E> {
    /// Open or create a database, drawing identifiers and timestamps from
    /// `env`.
    ///
    /// Creates tables if they don't exist (ITEMS, SETTINGS).
    pub fn open_with_env(path: impl AsRef<Path>, env: E) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(io_error)?;

        let txn = db.begin_write().map_err(io_error)?;
        {
            let _ = txn.open_table(ITEMS).map_err(io_error)?;
            let _ = txn.open_table(SETTINGS).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        tracing::debug!(path = %path.as_ref().display(), "opened vault database");
        Ok(Self { db: Arc::new(db), env })
    }
}

impl<E: Environment> RecordStore for RedbStore<E> {
    fn list(&self) -> Result<Vec<VaultItem>, StoreError> {
        let txn = self.db.begin_read().map_err(io_error)?;
        let table = txn.open_table(ITEMS).map_err(io_error)?;

        let mut items = Vec::new();
        for entry in table.iter().map_err(io_error)?.rev() {
            let (_, value) = entry.map_err(io_error)?;
            items.push(decode_item(value.value())?);
        }
        Ok(items)
    }

    fn create(&self, title: &str, content: &str) -> Result<VaultItem, StoreError> {
        let item = VaultItem {
            id: ItemId::new(self.env.random_u128()),
            title: title.to_owned(),
            is_encrypted: true,
            content: content.to_owned(),
            created_at: self.env.wall_clock_secs(),
        };
        let bytes = encode_item(&item)?;

        let txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut table = txn.open_table(ITEMS).map_err(io_error)?;
            let next = match table.last().map_err(io_error)? {
                Some((key, _)) => key.value() + 1,
                None => 0,
            };
            table.insert(next, bytes.as_slice()).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        Ok(item)
    }

    fn update(&self, id: ItemId, title: &str, content: &str) -> Result<VaultItem, StoreError> {
        let txn = self.db.begin_write().map_err(io_error)?;
        let item = {
            let mut table = txn.open_table(ITEMS).map_err(io_error)?;
            let (key, mut item) = find_item(&table, id)?.ok_or(StoreError::NotFound { id })?;

            title.clone_into(&mut item.title);
            content.clone_into(&mut item.content);

            let bytes = encode_item(&item)?;
            table.insert(key, bytes.as_slice()).map_err(io_error)?;
            item
        };
        txn.commit().map_err(io_error)?;

        Ok(item)
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut table = txn.open_table(ITEMS).map_err(io_error)?;
            let (key, _) = find_item(&table, id)?.ok_or(StoreError::NotFound { id })?;
            table.remove(key).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        Ok(())
    }
}

impl<E: Environment> SettingsStore for RedbStore<E> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let txn = self.db.begin_read().map_err(io_error)?;
        let table = txn.open_table(SETTINGS).map_err(io_error)?;

        let value = table.get(key).map_err(io_error)?;
        Ok(value.map(|guard| guard.value().to_owned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut table = txn.open_table(SETTINGS).map_err(io_error)?;
            table.insert(key, value).map_err(io_error)?;
        }
        txn.commit().map_err(io_error)?;

        Ok(())
    }
}

/// Scan for the record with `id`. Vaults are small enough that a linear
/// scan beats maintaining a second index.
fn find_item<T: ReadableTable<u64, &'static [u8]>>(
    table: &T,
    id: ItemId,
) -> Result<Option<(u64, VaultItem)>, StoreError> {
    for entry in table.iter().map_err(io_error)? {
        let (key, value) = entry.map_err(io_error)?;
        let item = decode_item(value.value())?;
        if item.id == id {
            return Ok(Some((key.value(), item)));
        }
    }
    Ok(None)
}

fn encode_item(item: &VaultItem) -> Result<Vec<u8>, StoreError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(item, &mut bytes)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(bytes)
}

fn decode_item(bytes: &[u8]) -> Result<VaultItem, StoreError> {
    ciborium::from_reader(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn io_error(err: impl Display) -> StoreError {
    StoreError::Io(err.to_string())
}
