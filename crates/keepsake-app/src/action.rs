//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use keepsake_core::Generation;

use crate::{Notice, Passphrase};

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the current view.
    Render,

    /// Hand the passphrase to the session key holder.
    Unlock {
        /// Passphrase as typed.
        passphrase: Passphrase,
    },

    /// Discard the held passphrase.
    Lock,

    /// Fetch, verify and decrypt records for the given unlock.
    FetchRecords {
        /// Unlock the fetch belongs to.
        generation: Generation,
    },

    /// End the user session with the record service.
    SignOut,

    /// Show a transient message.
    Notify {
        /// What to tell the user.
        notice: Notice,
    },
}
