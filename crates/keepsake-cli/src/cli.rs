//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use keepsake_core::{DEFAULT_PASSWORD_LENGTH, ItemId, SecretKind, SecretPayload, generate_password};
use keepsake_crypto::{DEFAULT_ITERATIONS, Entropy};

/// Keepsake password vault
///
/// No `Debug`: the arguments carry the passphrase.
#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Client-side encrypted password vault")]
#[command(version)]
pub struct Args {
    /// Vault database file
    #[arg(long, env = "KEEPSAKE_DB", default_value = "keepsake.redb")]
    pub db: PathBuf,

    /// Master passphrase
    #[arg(long, env = "KEEPSAKE_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// PBKDF2 iterations for newly encrypted records
    #[arg(long, env = "KEEPSAKE_ITERATIONS", default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt and store a new secret
    Add {
        /// The secret
        #[command(subcommand)]
        secret: SecretArgs,
    },

    /// List records, newest first
    List {
        /// Only records of this kind
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show one record with its secrets
    Show {
        /// Record identifier
        id: ItemId,
    },

    /// Replace a record's title and secret
    Edit {
        /// Record identifier
        id: ItemId,
        /// The new secret
        #[command(subcommand)]
        secret: SecretArgs,
    },

    /// Delete a record
    Delete {
        /// Record identifier
        id: ItemId,
    },

    /// Print a random password
    Generate {
        /// Number of characters
        #[arg(long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },

    /// Show or set the auto-lock timeout
    AutoLock {
        /// New timeout in milliseconds; 0 disables
        millis: Option<u64>,
    },
}

/// Secret fields for `add` and `edit`.
#[derive(Subcommand)]
pub enum SecretArgs {
    /// Login credential
    Password {
        /// Display title
        #[arg(long)]
        title: String,
        /// Account name
        #[arg(long)]
        username: Option<String>,
        /// Account password; generated when omitted
        #[arg(long)]
        password: Option<String>,
        /// Length of a generated password
        #[arg(long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
        length: usize,
    },

    /// Freeform note
    Note {
        /// Display title
        #[arg(long)]
        title: String,
        /// Note body
        #[arg(long)]
        note: String,
    },

    /// Bookmark
    Link {
        /// Display title
        #[arg(long)]
        title: String,
        /// Target address
        #[arg(long)]
        url: String,
        /// What the link is for
        #[arg(long)]
        description: Option<String>,
    },
}

impl SecretArgs {
    /// Title and payload, generating a password if none was given.
    pub fn into_parts(self, entropy: &impl Entropy) -> (String, SecretPayload) {
        match self {
            Self::Password { title, username, password, length } => {
                let password = password.unwrap_or_else(|| generate_password(entropy, length));
                (title, SecretPayload::Password { username, password: Some(password) })
            },
            Self::Note { title, note } => (title, SecretPayload::note(note)),
            Self::Link { title, url, description } => {
                (title, SecretPayload::link(url, description))
            },
        }
    }
}

/// Record kind filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Login credentials
    Password,
    /// Notes
    Note,
    /// Links
    Link,
}

impl From<KindArg> for SecretKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Password => Self::Password,
            KindArg::Note => Self::Note,
            KindArg::Link => Self::Link,
        }
    }
}
