//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (unlock, lock, logout) and window visibility.
//! - Results of actions the runtime executed (unlock accepted, records
//!   loaded or rejected).

use std::fmt;

use keepsake_core::{AutoLockTimeout, Generation, UnlockedItem};
use zeroize::Zeroizing;

/// Passphrase in transit from the user to the session key holder.
///
/// Zeroized on drop. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(Zeroizing<String>);

impl Passphrase {
    /// Wrap a typed passphrase.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(passphrase.into()))
    }

    /// The passphrase text.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether nothing was typed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase(<redacted>)")
    }
}

/// Events processed by the App state machine.
///
/// `I` is the instant type of the driving clock.
#[derive(Debug, Clone)]
pub enum AppEvent<I> {
    /// Periodic tick; drives auto-lock.
    Tick {
        /// Current instant.
        now: I,
    },

    /// User submitted the unlock form.
    UnlockRequested {
        /// Passphrase as typed.
        passphrase: Passphrase,
    },

    /// The session key holder accepted a passphrase.
    Unlocked {
        /// Generation assigned to the unlock.
        generation: Generation,
    },

    /// Records fetched and verified.
    RecordsLoaded {
        /// Unlock the records were verified against.
        generation: Generation,
        /// Decrypted records, newest first.
        records: Vec<UnlockedItem>,
    },

    /// The first record did not decrypt; the holder has been locked.
    VerificationFailed {
        /// Unlock that failed verification.
        generation: Generation,
    },

    /// Fetching records failed for a reason other than the passphrase.
    LoadFailed {
        /// Error description.
        message: String,
    },

    /// User asked to refresh the record list.
    RefreshRequested,

    /// User asked to lock the vault.
    LockRequested,

    /// User asked to sign out.
    LogoutRequested,

    /// The vault went out of view.
    Hidden {
        /// When it was hidden.
        at: I,
    },

    /// The vault is back in view.
    Visible,

    /// Auto-lock setting changed.
    AutoLockChanged {
        /// New timeout.
        timeout: AutoLockTimeout,
    },

    /// Error occurred.
    Error {
        /// Error description.
        message: String,
    },
}
