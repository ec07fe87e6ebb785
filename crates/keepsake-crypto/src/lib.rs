//! Keepsake Cipher Boundary
//!
//! Transforms a plaintext vault payload into an opaque, self-contained
//! ciphertext string before it leaves the device, and reverses the transform
//! after fetch. The store that holds the ciphertext is untrusted with respect
//! to confidentiality and never sees plaintext.
//!
//! # Pipeline
//!
//! ```text
//! Passphrase ──┐
//!              ▼
//! PBKDF2-HMAC-SHA256 (random salt, iteration count) → 32-byte key
//!              │
//!              ▼
//! XChaCha20-Poly1305 (random nonce, header as AAD) → ciphertext + tag
//!              │
//!              ▼
//! base64(version | kind | iterations | salt | nonce | ciphertext)
//! ```
//!
//! Everything decryption needs besides the passphrase travels inside the
//! envelope, so no side channel is required.
//!
//! # Failure Model
//!
//! [`encrypt`] fails only with [`CipherError`] when an argument is empty.
//!
//! [`decrypt`] never fails loudly. A wrong passphrase, a truncated or
//! tampered envelope, or text that was never ciphertext all collapse to
//! `None`. Callers cannot tell a wrong passphrase from a malformed record;
//! [`open`] exposes the underlying [`DecryptError`] for diagnostics.
//!
//! # Security
//!
//! - Fresh salt and nonce per encryption: equal plaintexts produce different
//!   ciphertexts
//! - The header (version, content kind, iterations, salt) is authenticated
//! - Derived keys and intermediate plaintext buffers are zeroized on drop
//! - Iteration counts read from an envelope are bounded by [`MAX_ITERATIONS`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod derivation;
mod entropy;
mod envelope;
mod error;
mod plaintext;

pub use cipher::{Cipher, decrypt, encrypt, open, seal_with};
pub use derivation::{DEFAULT_ITERATIONS, KEY_SIZE, KdfParams, MAX_ITERATIONS, derive_key};
pub use entropy::{Entropy, OsEntropy};
pub use envelope::{ContentKind, ENVELOPE_VERSION, Envelope, Header, NONCE_SIZE, SALT_SIZE};
pub use error::{CipherError, DecryptError};
pub use plaintext::Plaintext;
