//! Session key holder.
//!
//! Holds the unlock passphrase in memory for as long as the vault is open.
//!
//! ```text
//!            unlock(k)                  unlock(k')
//!   LOCKED ───────────► UNLOCKED(k) ─────────────► UNLOCKED(k')
//!      ▲                    │
//!      └────── lock() ──────┘
//! ```
//!
//! The holder does not check the passphrase; see [`crate::verify`] for the
//! policy layered on top. Every unlock gets a fresh [`Generation`] so the
//! verification policy can lock with compare-and-swap semantics.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use zeroize::Zeroizing;

use crate::error::VaultError;

/// The unlock passphrase.
///
/// Zeroized on drop. `Debug` never prints the value.
#[derive(Clone)]
pub struct SessionKey(Zeroizing<String>);

impl SessionKey {
    fn new(passphrase: String) -> Self {
        Self(Zeroizing::new(passphrase))
    }

    /// Passphrase for the cipher.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(<redacted>)")
    }
}

/// Identifies one particular unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

#[derive(Debug)]
struct HolderState {
    /// `None` while locked.
    slot: Option<(Generation, SessionKey)>,
    /// Generation handed to the next unlock.
    next_generation: u64,
}

/// In-memory holder of the unlock passphrase.
///
/// One instance per process, shared by reference (typically `Arc`). All
/// transitions happen under a single mutex, so a lock is complete before
/// any later read can observe the key. The mutex is never held while
/// encrypting or decrypting: operations capture the key with
/// [`current_key`](Self::current_key) and work on their own copy.
#[derive(Debug)]
pub struct SessionKeyHolder {
    state: Mutex<HolderState>,
}

impl SessionKeyHolder {
    /// A holder in the `Locked` state.
    pub fn new() -> Self {
        Self { state: Mutex::new(HolderState { slot: None, next_generation: 0 }) }
    }

    /// Hold `passphrase`, replacing any previous key.
    ///
    /// Accepted without checking correctness.
    ///
    /// # Errors
    ///
    /// - `EmptyPassphrase`: an empty passphrase can never encrypt anything
    pub fn unlock(&self, passphrase: impl Into<String>) -> Result<Generation, VaultError> {
        let key = SessionKey::new(passphrase.into());
        if key.expose().is_empty() {
            return Err(VaultError::EmptyPassphrase);
        }

        let mut state = self.state();
        let generation = Generation(state.next_generation);
        state.next_generation = state.next_generation.wrapping_add(1);
        state.slot = Some((generation, key));
        drop(state);

        tracing::debug!(?generation, "vault unlocked");
        Ok(generation)
    }

    /// Discard the key. Returns `true` if a key was held.
    pub fn lock(&self) -> bool {
        let was_unlocked = self.state().slot.take().is_some();
        if was_unlocked {
            tracing::debug!("vault locked");
        }
        was_unlocked
    }

    /// Discard the key only if it still belongs to `generation`.
    ///
    /// Returns `true` if the key was discarded. A newer unlock is left alone.
    pub fn lock_if_current(&self, generation: Generation) -> bool {
        let mut state = self.state();
        let is_current = matches!(&state.slot, Some((held, _)) if *held == generation);
        if is_current {
            state.slot = None;
            drop(state);
            tracing::debug!(?generation, "vault locked after failed verification");
        }
        is_current
    }

    /// Whether a key is held.
    pub fn is_unlocked(&self) -> bool {
        self.state().slot.is_some()
    }

    /// Generation of the held key. `None` while locked.
    pub fn generation(&self) -> Option<Generation> {
        self.state().slot.as_ref().map(|(generation, _)| *generation)
    }

    /// Copy of the held key for an in-flight operation. `None` while locked.
    pub fn current_key(&self) -> Option<(Generation, SessionKey)> {
        self.state().slot.clone()
    }

    fn state(&self) -> MutexGuard<'_, HolderState> {
        // A panic elsewhere cannot leave the slot half-written; every
        // mutation is a single assignment.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionKeyHolder {
    fn default() -> Self {
        Self::new()
    }
}
