//! Durable storage for the command-line vault.
//!
//! The CLI persists records and settings in a single Redb file. Everything in
//! it is either ciphertext or non-secret (titles, timestamps, settings).

mod redb;

pub use self::redb::RedbStore;
