//! Secret payloads.
//!
//! The payload is the only part of a record that gets encrypted. Its kind
//! travels inside the plaintext as a `"type"` field because after encryption
//! the store cannot tell one kind from another.

use std::fmt;

use keepsake_crypto::{CipherError, Plaintext};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the tag field inside the JSON plaintext.
const TYPE_FIELD: &str = "type";

/// A secret, exactly one kind at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum SecretPayload {
    /// Login credential.
    Password {
        /// Account name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        /// Account password.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
    /// Freeform note.
    Note {
        /// Note body.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Bookmark.
    Link {
        /// Target address.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// What the link is for.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SecretPayload {
    /// Login credential with both fields set.
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password { username: Some(username.into()), password: Some(password.into()) }
    }

    /// Note with a body.
    pub fn note(note: impl Into<String>) -> Self {
        Self::Note { note: Some(note.into()) }
    }

    /// Link with an address and optional description.
    pub fn link(url: impl Into<String>, description: Option<String>) -> Self {
        Self::Link { url: Some(url.into()), description }
    }

    /// Field-less discriminant.
    pub fn kind(&self) -> SecretKind {
        match self {
            Self::Password { .. } => SecretKind::Password,
            Self::Note { .. } => SecretKind::Note,
            Self::Link { .. } => SecretKind::Link,
        }
    }

    /// Structured plaintext for the cipher.
    pub fn to_plaintext(&self) -> Result<Plaintext, CipherError> {
        Plaintext::json(self)
    }

    /// Interpret a decrypted plaintext.
    ///
    /// Objects written before the tag existed carry only `username` and
    /// `password`; they are read as [`SecretKind::Password`]. Text plaintext
    /// and values of any other shape yield `None`.
    pub fn from_plaintext(plaintext: &Plaintext) -> Option<Self> {
        let Value::Object(map) = plaintext.as_json()? else {
            return None;
        };

        if map.contains_key(TYPE_FIELD) {
            return Self::deserialize(&Value::Object(map.clone())).ok();
        }

        let mut tagged = map.clone();
        tagged.insert(TYPE_FIELD.to_owned(), Value::from(SecretKind::Password.as_str()));
        Self::deserialize(&Value::Object(tagged)).ok()
    }
}

/// Kind of a [`SecretPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecretKind {
    /// [`SecretPayload::Password`]
    Password,
    /// [`SecretPayload::Note`]
    Note,
    /// [`SecretPayload::Link`]
    Link,
}

impl SecretKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Password, Self::Note, Self::Link];

    /// Tag value as stored in the plaintext.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Password => "PASSWORD",
            Self::Note => "NOTE",
            Self::Link => "LINK",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
