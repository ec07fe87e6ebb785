//! Stored vault records.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::payload::{SecretKind, SecretPayload};

/// 128-bit record identifier, rendered as 32 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ItemId(u128);

impl ItemId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> u128 {
        self.0
    }

    /// Big-endian bytes, used as a storage key.
    pub fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// Error parsing an [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid item id {0:?}: expected up to 32 hex digits")]
pub struct ParseItemIdError(String);

impl FromStr for ItemId {
    type Err = ParseItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseItemIdError(s.to_owned()));
        }
        u128::from_str_radix(s, 16).map(Self).map_err(|_| ParseItemIdError(s.to_owned()))
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ItemId {
    type Error = ParseItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A record as persisted by the store.
///
/// `content` is ciphertext produced by the cipher boundary. `title` stays in
/// the clear so records can be browsed without unlocking; this is a
/// confidentiality trade-off, not an oversight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultItem {
    /// Store-assigned identifier.
    pub id: ItemId,
    /// Unencrypted display title.
    pub title: String,
    /// Always `true` for records written by this client.
    pub is_encrypted: bool,
    /// Opaque ciphertext.
    pub content: String,
    /// Unix timestamp (seconds) when the record was created.
    pub created_at: u64,
}

/// A record paired with its decrypted payload.
///
/// Only produced after the session key was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedItem {
    /// The stored record.
    pub item: VaultItem,
    /// Decrypted secret.
    pub payload: SecretPayload,
}

impl UnlockedItem {
    /// Kind of the decrypted payload.
    pub fn kind(&self) -> SecretKind {
        self.payload.kind()
    }
}

/// Keep only items whose payload is one of `kinds`, preserving order.
pub fn filter_kinds(items: Vec<UnlockedItem>, kinds: &[SecretKind]) -> Vec<UnlockedItem> {
    items.into_iter().filter(|item| kinds.contains(&item.kind())).collect()
}
