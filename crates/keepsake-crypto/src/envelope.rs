//! Ciphertext envelope layout.
//!
//! ```text
//! offset  size  field
//! 0       1     version (currently 1)
//! 1       1     content kind (0x00 text, 0x01 JSON)
//! 2       4     PBKDF2 iterations (big-endian)
//! 6       16    salt
//! 22      24    XChaCha20 nonce
//! 46      n+16  ciphertext with Poly1305 tag
//! ```
//!
//! The first 22 bytes form the [`Header`], which is bound to the ciphertext
//! as associated data. The whole envelope is carried as standard base64.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{derivation::KdfParams, error::DecryptError};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// PBKDF2 salt size (16 bytes)
pub const SALT_SIZE: usize = 16;

/// XChaCha20 nonce size (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub(crate) const TAG_SIZE: usize = 16;

/// Encoded header size: version + kind + iterations + salt.
pub(crate) const HEADER_SIZE: usize = 1 + 1 + 4 + SALT_SIZE;

/// Smallest envelope that can hold a tag over a one-byte plaintext.
const MIN_ENVELOPE_SIZE: usize = HEADER_SIZE + NONCE_SIZE + TAG_SIZE + 1;

/// How the decrypted bytes are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Freeform UTF-8 text, returned as is.
    Text,
    /// Serialized JSON, always parsed on decryption.
    Json,
}

impl ContentKind {
    /// Wire byte for this kind.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Text => 0x00,
            Self::Json => 0x01,
        }
    }

    /// Parse a wire byte. `None` for unknown kinds.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Text),
            0x01 => Some(Self::Json),
            _ => None,
        }
    }
}

/// Authenticated envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Interpretation of the plaintext.
    pub kind: ContentKind,
    /// PBKDF2 iteration count used to derive the key.
    pub iterations: u32,
    /// PBKDF2 salt.
    pub salt: [u8; SALT_SIZE],
}

impl Header {
    /// Encode to the fixed 22-byte layout.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0] = ENVELOPE_VERSION;
        out[1] = self.kind.to_byte();
        out[2..6].copy_from_slice(&self.iterations.to_be_bytes());
        out[6..HEADER_SIZE].copy_from_slice(&self.salt);
        out
    }

    /// Decode and validate a header.
    ///
    /// # Errors
    ///
    /// - `Truncated`: fewer than 22 bytes
    /// - `UnsupportedVersion`: version byte is not [`ENVELOPE_VERSION`]
    /// - `UnknownContentKind`: kind byte is not recognised
    /// - `IterationsOutOfRange`: iteration count is zero or too large
    pub fn decode(bytes: &[u8]) -> Result<Self, DecryptError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DecryptError::Truncated { len: bytes.len() });
        }

        let version = bytes[0];
        if version != ENVELOPE_VERSION {
            return Err(DecryptError::UnsupportedVersion { version });
        }

        let kind = ContentKind::from_byte(bytes[1])
            .ok_or(DecryptError::UnknownContentKind { kind: bytes[1] })?;

        let iterations = u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        if !KdfParams::accepts(iterations) {
            return Err(DecryptError::IterationsOutOfRange { iterations });
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&bytes[6..HEADER_SIZE]);

        Ok(Self { kind, iterations, salt })
    }
}

/// A parsed ciphertext envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Authenticated header.
    pub header: Header,
    /// The 24-byte `XChaCha20` nonce.
    pub nonce: [u8; NONCE_SIZE],
    /// Ciphertext including the 16-byte Poly1305 tag.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Plaintext length (ciphertext length minus authentication tag).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len().saturating_sub(TAG_SIZE)
    }

    /// Serialize to raw bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.header.encode());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse raw bytes.
    ///
    /// # Errors
    ///
    /// - `Truncated`: too short to hold header, nonce, tag and one byte
    /// - any error from [`Header::decode`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecryptError> {
        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(DecryptError::Truncated { len: bytes.len() });
        }

        let header = Header::decode(&bytes[..HEADER_SIZE])?;

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + NONCE_SIZE]);

        let ciphertext = bytes[HEADER_SIZE + NONCE_SIZE..].to_vec();

        Ok(Self { header, nonce, ciphertext })
    }

    /// Encode as standard base64 text.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse standard base64 text.
    ///
    /// # Errors
    ///
    /// - `Encoding`: not canonical standard base64
    /// - any error from [`Envelope::from_bytes`]
    pub fn from_base64(text: &str) -> Result<Self, DecryptError> {
        let bytes = STANDARD.decode(text).map_err(|_| DecryptError::Encoding)?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_envelope() -> Envelope {
        Envelope {
            header: Header { kind: ContentKind::Json, iterations: 1000, salt: [0xAB; SALT_SIZE] },
            nonce: [0xCD; NONCE_SIZE],
            ciphertext: vec![0xEF; TAG_SIZE + 5],
        }
    }

    #[test]
    fn header_layout() {
        let header =
            Header { kind: ContentKind::Text, iterations: 0x0102_0304, salt: [0x77; SALT_SIZE] };
        let bytes = header.encode();

        assert_eq!(bytes[0], ENVELOPE_VERSION);
        assert_eq!(bytes[1], 0x00);
        assert_eq!(&bytes[2..6], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[6..22], &[0x77; SALT_SIZE]);
    }

    #[test]
    fn header_roundtrip() {
        let header = sample_envelope().header;
        assert_eq!(Header::decode(&header.encode()), Ok(header));
    }

    #[test]
    fn envelope_base64_roundtrip() {
        let envelope = sample_envelope();
        let text = envelope.to_base64();
        assert_eq!(Envelope::from_base64(&text), Ok(envelope));
    }

    #[test]
    fn plaintext_len_calculation() {
        assert_eq!(sample_envelope().plaintext_len(), 5);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = sample_envelope().to_bytes();
        bytes[0] = 9;
        assert_eq!(Envelope::from_bytes(&bytes), Err(DecryptError::UnsupportedVersion { version: 9 }));
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut bytes = sample_envelope().to_bytes();
        bytes[1] = 0x42;
        assert_eq!(Envelope::from_bytes(&bytes), Err(DecryptError::UnknownContentKind { kind: 0x42 }));
    }

    #[test]
    fn rejects_zero_iterations() {
        let mut bytes = sample_envelope().to_bytes();
        bytes[2..6].copy_from_slice(&0u32.to_be_bytes());
        assert_eq!(
            Envelope::from_bytes(&bytes),
            Err(DecryptError::IterationsOutOfRange { iterations: 0 })
        );
    }

    #[test]
    fn rejects_excessive_iterations() {
        let mut bytes = sample_envelope().to_bytes();
        bytes[2..6].copy_from_slice(&u32::MAX.to_be_bytes());
        assert_eq!(
            Envelope::from_bytes(&bytes),
            Err(DecryptError::IterationsOutOfRange { iterations: u32::MAX })
        );
    }

    #[test]
    fn rejects_truncated() {
        let bytes = sample_envelope().to_bytes();
        let short = &bytes[..MIN_ENVELOPE_SIZE - 1];
        assert_eq!(
            Envelope::from_bytes(short),
            Err(DecryptError::Truncated { len: MIN_ENVELOPE_SIZE - 1 })
        );
    }

    #[test]
    fn rejects_non_base64() {
        assert_eq!(Envelope::from_base64("not base64 !!"), Err(DecryptError::Encoding));
        assert_eq!(Envelope::from_base64("{\"type\":\"NOTE\"}"), Err(DecryptError::Encoding));
    }

    #[test]
    fn content_kind_bytes() {
        for kind in [ContentKind::Text, ContentKind::Json] {
            assert_eq!(ContentKind::from_byte(kind.to_byte()), Some(kind));
        }
        assert_eq!(ContentKind::from_byte(0x02), None);
    }
}
