//! Passphrase key derivation using PBKDF2-HMAC-SHA256

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{envelope::SALT_SIZE, error::CipherError};

/// Size of the derived XChaCha20-Poly1305 key (32 bytes)
pub const KEY_SIZE: usize = 32;

/// Iteration count used when the caller does not choose one.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Upper bound on the iteration count accepted from an envelope.
///
/// The count is read from untrusted input before authentication, so it caps
/// the CPU a crafted ciphertext can burn.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Key derivation parameters recorded in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    iterations: u32,
}

impl KdfParams {
    /// Parameters with a specific iteration count.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument`: `iterations` is zero or above [`MAX_ITERATIONS`]
    pub fn new(iterations: u32) -> Result<Self, CipherError> {
        if !Self::accepts(iterations) {
            return Err(CipherError::InvalidArgument {
                reason: "iteration count out of range",
            });
        }
        Ok(Self { iterations })
    }

    /// PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether an iteration count read from an envelope is acceptable.
    pub(crate) fn accepts(iterations: u32) -> bool {
        (1..=MAX_ITERATIONS).contains(&iterations)
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { iterations: DEFAULT_ITERATIONS }
    }
}

/// Derive a 32-byte cipher key from a passphrase.
///
/// Deterministic: the same passphrase, salt and iteration count always yield
/// the same key. The returned buffer is zeroized when dropped.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8; SALT_SIZE],
    iterations: u32,
) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, &mut *key);
    key
}
