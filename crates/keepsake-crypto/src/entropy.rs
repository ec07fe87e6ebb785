//! Randomness source for salts and nonces.

/// Source of cryptographically secure random bytes.
///
/// Production code uses [`OsEntropy`]. Tests substitute a fixed or seeded
/// source to make ciphertexts reproducible.
pub trait Entropy {
    /// Fill `buffer` with random bytes.
    fn fill(&self, buffer: &mut [u8]);
}

impl<E: Entropy + ?Sized> Entropy for &E {
    fn fill(&self, buffer: &mut [u8]) {
        (**self).fill(buffer);
    }
}

/// Operating system RNG via getrandom.
///
/// # Panics
///
/// Panics if the OS RNG fails. Encrypting with predictable salts and nonces
/// would silently weaken every record written afterwards, so there is no
/// fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl Entropy for OsEntropy {
    #[allow(clippy::expect_used)]
    fn fill(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - cannot encrypt securely");
    }
}
