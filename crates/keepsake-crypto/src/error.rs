//! Cipher boundary error types.

use thiserror::Error;

/// Errors returned by encryption.
///
/// Decryption never returns this type; see [`DecryptError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// A required argument was missing or empty.
    ///
    /// Fatal to the calling operation. Not retried.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Which argument was rejected.
        reason: &'static str,
    },

    /// A structured payload could not be serialized to JSON.
    #[error("failed to serialize plaintext: {reason}")]
    Serialization {
        /// Serializer message.
        reason: String,
    },
}

/// Why a ciphertext could not be opened.
///
/// [`crate::decrypt`] folds every variant into `None`; the distinction exists
/// only for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptError {
    /// Ciphertext or passphrase was empty.
    #[error("empty ciphertext or passphrase")]
    EmptyInput,

    /// Ciphertext was not valid base64.
    #[error("ciphertext is not valid base64")]
    Encoding,

    /// Decoded envelope is shorter than the fixed header, nonce and tag.
    #[error("envelope truncated: {len} bytes")]
    Truncated {
        /// Decoded length in bytes.
        len: usize,
    },

    /// Envelope was written by an unknown format version.
    #[error("unsupported envelope version {version}")]
    UnsupportedVersion {
        /// Version byte found in the envelope.
        version: u8,
    },

    /// Content kind byte is not recognised.
    #[error("unknown content kind {kind:#04x}")]
    UnknownContentKind {
        /// Kind byte found in the envelope.
        kind: u8,
    },

    /// Iteration count is zero or above the accepted maximum.
    #[error("iteration count {iterations} out of range")]
    IterationsOutOfRange {
        /// Iteration count found in the envelope.
        iterations: u32,
    },

    /// Authentication tag did not verify (wrong passphrase or tampering).
    #[error("authentication failed")]
    Authentication,

    /// Decrypted bytes are not UTF-8.
    #[error("plaintext is not UTF-8")]
    NotUtf8,

    /// Decrypted text is empty.
    #[error("plaintext is empty")]
    Empty,

    /// A structured envelope held text that does not parse as JSON.
    #[error("structured plaintext is not valid JSON")]
    MalformedJson,
}
