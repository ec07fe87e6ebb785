//! Keepsake core
//!
//! Domain layer around the cipher boundary: what a secret looks like, who
//! holds the unlock passphrase, and how records move between the cipher and
//! an untrusted store.
//!
//! # Components
//!
//! - [`SecretPayload`]: tagged secret kinds, serialized with the tag inside
//!   the encrypted plaintext
//! - [`SessionKeyHolder`]: `Locked` / `Unlocked(key)` state, memory only
//! - [`open_records`]: verify-then-decrypt policy that re-locks the holder on
//!   a wrong passphrase
//! - [`RecordStore`] and [`SettingsStore`]: seams to external persistence
//! - [`VaultService`]: create, list, update and delete through the cipher
//! - [`AutoLockTimer`]: inactivity lock driven by caller-supplied instants
//! - [`Environment`]: time and randomness, swappable for simulation
//!
//! # Invariants
//!
//! - The passphrase is never persisted, logged or handed to a store
//! - Records are exposed only after the first record verified the key (or
//!   there was nothing to verify against)
//! - A verify-driven lock never clears a key installed by a later unlock

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod autolock;
pub mod env;
pub mod error;
pub mod generator;
pub mod item;
pub mod payload;
pub mod service;
pub mod session;
pub mod settings;
pub mod store;
pub mod verify;

pub use autolock::AutoLockTimer;
pub use env::{Environment, SimEnv, SystemEnv};
pub use error::VaultError;
pub use generator::{DEFAULT_PASSWORD_LENGTH, PASSWORD_CHARSET, generate_password};
pub use item::{ItemId, ParseItemIdError, UnlockedItem, VaultItem, filter_kinds};
pub use payload::{SecretKind, SecretPayload};
pub use service::VaultService;
pub use session::{Generation, SessionKey, SessionKeyHolder};
pub use settings::{
    AUTO_LOCK_KEY, AUTO_LOCK_PRESETS, AutoLockPreset, AutoLockTimeout, MemorySettings,
    SettingsStore, load_auto_lock, save_auto_lock,
};
pub use store::{MemoryStore, RecordStore, StoreError};
pub use verify::{Verification, open_records, open_records_with_key, verify_key};
