//! CLI error types.

use std::{io, process::ExitCode};

use keepsake_core::{ItemId, StoreError, VaultError};
use keepsake_crypto::CipherError;
use thiserror::Error;

/// Errors that end a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command needs the vault open but no passphrase was given.
    #[error("passphrase required: pass --passphrase or set KEEPSAKE_PASSPHRASE")]
    MissingPassphrase,

    /// The passphrase failed verification.
    ///
    /// Transient: run the command again with the right passphrase.
    #[error("wrong master passphrase, try unlocking again")]
    WrongPassphrase,

    /// The vault did not open for another reason.
    #[error("vault did not unlock: {0}")]
    Unlock(String),

    /// No visible record has this identifier.
    #[error("record {0} not found")]
    NotFound(ItemId),

    /// Invalid key-derivation parameters.
    #[error("invalid configuration: {0}")]
    Config(#[from] CipherError),

    /// Vault operation failed.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Database failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// `2` means "try again with another passphrase", `1` anything else.
    pub fn exit_code(&self) -> ExitCode {
        if self.is_retryable() { ExitCode::from(2) } else { ExitCode::FAILURE }
    }

    /// Whether running again with another passphrase may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::WrongPassphrase | Self::MissingPassphrase => true,
            Self::Vault(err) => err.is_retryable(),
            _ => false,
        }
    }
}
