//! Plaintext accepted by encryption and returned by decryption.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use zeroize::Zeroizing;

use crate::{envelope::ContentKind, error::CipherError};

/// Plaintext before encryption or after decryption.
///
/// Strings are carried verbatim. Structured values are serialized to JSON and
/// parsed back on decryption, so a value round-trips to an equal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plaintext {
    /// Freeform text.
    Text(String),
    /// Structured value.
    Json(Value),
}

impl Plaintext {
    /// Serialize any value into a structured plaintext.
    ///
    /// # Errors
    ///
    /// - `Serialization`: the value cannot be represented as JSON
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, CipherError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| CipherError::Serialization { reason: e.to_string() })
    }

    /// Text content. `None` for structured plaintext.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Structured content. `None` for text plaintext.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Text(_) => None,
            Self::Json(value) => Some(value),
        }
    }

    /// Deserialize structured content into `T`.
    ///
    /// `None` for text plaintext or when the value does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Option<T> {
        self.as_json().and_then(|value| T::deserialize(value).ok())
    }

    /// Content kind recorded in the envelope.
    pub(crate) fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Json(_) => ContentKind::Json,
        }
    }

    /// Bytes to encrypt.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument`: text is empty or the value is JSON `null`
    pub(crate) fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, CipherError> {
        let bytes = match self {
            Self::Text(text) => Zeroizing::new(text.as_bytes().to_vec()),
            Self::Json(Value::Null) => {
                return Err(CipherError::InvalidArgument { reason: "payload is missing" });
            },
            Self::Json(value) => Zeroizing::new(
                serde_json::to_vec(value)
                    .map_err(|e| CipherError::Serialization { reason: e.to_string() })?,
            ),
        };

        if bytes.is_empty() {
            return Err(CipherError::InvalidArgument { reason: "payload is empty" });
        }

        Ok(bytes)
    }
}

impl From<String> for Plaintext {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Plaintext {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for Plaintext {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
