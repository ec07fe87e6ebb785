//! Record store abstraction.
//!
//! The store is the external record service: it sees titles and ciphertext,
//! never plaintext or the passphrase. The trait is synchronous; callers that
//! need concurrency share a clone across threads.

mod memory;

pub use memory::MemoryStore;
use thiserror::Error;

use crate::item::{ItemId, VaultItem};

/// Errors from a record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this identifier.
    #[error("record {id} not found")]
    NotFound {
        /// Requested identifier.
        id: ItemId,
    },

    /// The backing medium failed (disk, database, network).
    ///
    /// May be transient; the operation had no effect.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// A stored value could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(String),
}

/// Persistence for encrypted records.
///
/// Must be Clone (shared by the service and the runtime), Send + Sync
/// (thread-safe), and synchronous. Implementations share internal state, so
/// clones access the same records.
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// All records, newest first.
    ///
    /// The first record is the one used to verify the passphrase.
    fn list(&self) -> Result<Vec<VaultItem>, StoreError>;

    /// Persist a new record and return it with its assigned identifier and
    /// creation time. `is_encrypted` is always `true`.
    fn create(&self, title: &str, content: &str) -> Result<VaultItem, StoreError>;

    /// Replace title and content of an existing record.
    ///
    /// Identifier and creation time are unchanged.
    fn update(&self, id: ItemId, title: &str, content: &str) -> Result<VaultItem, StoreError>;

    /// Remove a record.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;
}
