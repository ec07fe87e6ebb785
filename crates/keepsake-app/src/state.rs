//! Observable application state types.
//!
//! [`VaultView`] is what a frontend may render. Decrypted records only ever
//! appear in [`VaultView::Unlocked`], and only after verification.

use std::fmt;

use keepsake_core::{Generation, SecretKind, UnlockedItem};

/// What the user can currently see.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VaultView {
    /// No passphrase held. Nothing decrypted is visible.
    #[default]
    Locked,

    /// A passphrase was submitted; records are being fetched and verified.
    Verifying {
        /// Assigned once the holder accepted the passphrase.
        generation: Option<Generation>,
    },

    /// Verified and decrypted.
    Unlocked {
        /// Unlock the items were verified against.
        generation: Generation,
        /// Decrypted records, newest first.
        items: Vec<UnlockedItem>,
    },
}

impl VaultView {
    /// Whether decrypted records are visible.
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked { .. })
    }

    /// Visible records. Empty unless unlocked.
    pub fn items(&self) -> &[UnlockedItem] {
        match self {
            Self::Unlocked { items, .. } => items,
            Self::Locked | Self::Verifying { .. } => &[],
        }
    }

    /// Visible records of the given kinds, in order.
    pub fn items_of<'a>(
        &'a self,
        kinds: &'a [SecretKind],
    ) -> impl Iterator<Item = &'a UnlockedItem> + 'a {
        self.items().iter().filter(|item| kinds.contains(&item.kind()))
    }

    /// Generation the view is tied to. `None` when locked or not yet
    /// accepted.
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Self::Locked => None,
            Self::Verifying { generation } => *generation,
            Self::Unlocked { generation, .. } => Some(*generation),
        }
    }
}

/// Transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The passphrase failed verification.
    WrongPassphrase,
    /// The vault locked itself after inactivity.
    AutoLocked,
    /// Something else went wrong.
    Failed {
        /// Error description.
        message: String,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPassphrase => f.write_str("wrong master passphrase, try unlocking again"),
            Self::AutoLocked => f.write_str("vault locked after inactivity"),
            Self::Failed { message } => write!(f, "error: {message}"),
        }
    }
}
