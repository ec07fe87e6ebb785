//! Passphrase encryption using `XChaCha20-Poly1305`
//!
//! [`seal_with`] and [`open`] are pure. Randomness enters only through
//! [`Cipher`], which draws salt and nonce from its [`Entropy`] source.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};
use zeroize::Zeroizing;

use crate::{
    derivation::{KdfParams, derive_key},
    entropy::{Entropy, OsEntropy},
    envelope::{ContentKind, Envelope, Header, NONCE_SIZE, SALT_SIZE},
    error::{CipherError, DecryptError},
    plaintext::Plaintext,
};

/// Passphrase cipher with configurable key derivation and randomness.
///
/// Decryption reads its parameters from the envelope, so a `Cipher` with
/// any parameters opens ciphertext written by any other.
#[derive(Debug, Clone, Default)]
pub struct Cipher<R = OsEntropy> {
    params: KdfParams,
    entropy: R,
}

impl Cipher<OsEntropy> {
    /// Cipher with default parameters and OS randomness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cipher with custom parameters and OS randomness.
    pub fn with_params(params: KdfParams) -> Self {
        Self { params, entropy: OsEntropy }
    }
}

impl<R: Entropy> Cipher<R> {
    /// Cipher with custom parameters and randomness.
    pub fn with_entropy(params: KdfParams, entropy: R) -> Self {
        Self { params, entropy }
    }

    /// Key derivation parameters used for new ciphertexts.
    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Encrypt a plaintext under a passphrase.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument`: passphrase or plaintext is empty
    /// - `Serialization`: structured plaintext cannot be serialized
    pub fn encrypt(
        &self,
        plaintext: impl Into<Plaintext>,
        passphrase: &str,
    ) -> Result<String, CipherError> {
        let mut salt = [0u8; SALT_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        self.entropy.fill(&mut salt);
        self.entropy.fill(&mut nonce);

        seal_with(&plaintext.into(), passphrase, self.params, salt, nonce)
    }

    /// Decrypt a ciphertext. `None` if it cannot be recovered under this
    /// passphrase.
    pub fn decrypt(&self, ciphertext: &str, passphrase: &str) -> Option<Plaintext> {
        decrypt(ciphertext, passphrase)
    }
}

/// Encrypt with default parameters and OS randomness.
///
/// # Errors
///
/// - `InvalidArgument`: passphrase or plaintext is empty
/// - `Serialization`: structured plaintext cannot be serialized
pub fn encrypt(plaintext: impl Into<Plaintext>, passphrase: &str) -> Result<String, CipherError> {
    Cipher::new().encrypt(plaintext, passphrase)
}

/// Decrypt a ciphertext produced by [`encrypt`].
///
/// Returns `None` for empty input, a wrong passphrase, or a malformed
/// ciphertext. Never panics.
pub fn decrypt(ciphertext: &str, passphrase: &str) -> Option<Plaintext> {
    match open(ciphertext, passphrase) {
        Ok(plaintext) => Some(plaintext),
        Err(err) => {
            tracing::debug!(%err, "ciphertext could not be opened");
            None
        },
    }
}

/// Encrypt with caller-provided salt and nonce.
///
/// Deterministic for fixed inputs. Callers MUST supply fresh random salt and
/// nonce in production; reusing a nonce under the same key breaks
/// confidentiality.
///
/// # Errors
///
/// - `InvalidArgument`: passphrase or plaintext is empty
/// - `Serialization`: structured plaintext cannot be serialized
pub fn seal_with(
    plaintext: &Plaintext,
    passphrase: &str,
    params: KdfParams,
    salt: [u8; SALT_SIZE],
    nonce: [u8; NONCE_SIZE],
) -> Result<String, CipherError> {
    if passphrase.is_empty() {
        return Err(CipherError::InvalidArgument { reason: "passphrase is empty" });
    }
    let bytes = plaintext.to_bytes()?;

    let header = Header { kind: plaintext.kind(), iterations: params.iterations(), salt };
    let aad = header.encode();
    let key = derive_key(passphrase.as_bytes(), &salt, params.iterations());
    let cipher = XChaCha20Poly1305::new((&*key).into());

    let Ok(ciphertext) =
        cipher.encrypt(XNonce::from_slice(&nonce), Payload { msg: &bytes, aad: &aad })
    else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    Ok(Envelope { header, nonce, ciphertext }.to_base64())
}

/// Decrypt a ciphertext, reporting why it failed.
///
/// # Errors
///
/// - `EmptyInput`: ciphertext or passphrase is empty
/// - `Encoding`, `Truncated`, `UnsupportedVersion`, `UnknownContentKind`,
///   `IterationsOutOfRange`: the envelope is malformed
/// - `Authentication`: wrong passphrase or tampered envelope
/// - `NotUtf8`, `Empty`, `MalformedJson`: the recovered bytes are unusable
pub fn open(ciphertext: &str, passphrase: &str) -> Result<Plaintext, DecryptError> {
    if ciphertext.is_empty() || passphrase.is_empty() {
        return Err(DecryptError::EmptyInput);
    }

    let envelope = Envelope::from_base64(ciphertext)?;
    let header = envelope.header;
    let aad = header.encode();
    let key = derive_key(passphrase.as_bytes(), &header.salt, header.iterations);
    let cipher = XChaCha20Poly1305::new((&*key).into());

    let bytes = cipher
        .decrypt(
            XNonce::from_slice(&envelope.nonce),
            Payload { msg: &envelope.ciphertext, aad: &aad },
        )
        .map(Zeroizing::new)
        .map_err(|_| DecryptError::Authentication)?;

    if bytes.is_empty() {
        return Err(DecryptError::Empty);
    }
    let text = std::str::from_utf8(&bytes).map_err(|_| DecryptError::NotUtf8)?;

    match header.kind {
        ContentKind::Text => Ok(Plaintext::Text(text.to_owned())),
        ContentKind::Json => serde_json::from_str(text)
            .map(Plaintext::Json)
            .map_err(|_| DecryptError::MalformedJson),
    }
}
