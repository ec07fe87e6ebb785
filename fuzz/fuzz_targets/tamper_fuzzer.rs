//! Fuzz target for tampered ciphertexts
//!
//! Seals a real record, then applies arbitrary byte mutations to the decoded
//! envelope before re-encoding it.
//!
//! # Strategy
//!
//! - XOR masks at arbitrary offsets (header, nonce, body, tag)
//! - Truncation to an arbitrary length
//! - Appended trailing bytes
//!
//! # Invariants
//!
//! - Any change to the sealed bytes makes decryption fail
//! - The untouched ciphertext still opens to the original plaintext
//! - Decryption NEVER panics

#![no_main]

use arbitrary::Arbitrary;
use keepsake_crypto::{decrypt, seal_with, Envelope, KdfParams, Plaintext};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct TamperScenario {
    salt: [u8; 16],
    nonce: [u8; 24],
    text: String,
    mutations: Vec<Mutation>,
}

#[derive(Debug, Arbitrary)]
enum Mutation {
    /// XOR a byte at `offset` (mod length) with a non-zero mask.
    Flip { offset: u16, mask: u8 },
    /// Keep only the first `len` bytes.
    Truncate { len: u16 },
    /// Append bytes.
    Extend { bytes: Vec<u8> },
}

const PASSPHRASE: &str = "fuzz-passphrase";

fuzz_target!(|scenario: TamperScenario| {
    if scenario.text.is_empty() {
        return;
    }
    let Ok(params) = KdfParams::new(1) else { return };
    let plaintext = Plaintext::Text(scenario.text);

    let Ok(sealed) = seal_with(&plaintext, PASSPHRASE, params, scenario.salt, scenario.nonce)
    else {
        return;
    };
    assert_eq!(decrypt(&sealed, PASSPHRASE), Some(plaintext));

    let Ok(envelope) = Envelope::from_base64(&sealed) else {
        panic!("sealed ciphertext failed to parse");
    };
    let original = envelope.to_bytes();
    let mut bytes = original.clone();

    for mutation in scenario.mutations {
        match mutation {
            Mutation::Flip { offset, mask } => {
                if bytes.is_empty() || mask == 0 {
                    continue;
                }
                let idx = usize::from(offset) % bytes.len();
                bytes[idx] ^= mask;
            },
            Mutation::Truncate { len } => bytes.truncate(usize::from(len)),
            Mutation::Extend { bytes: extra } => bytes.extend_from_slice(&extra),
        }
    }

    if bytes == original {
        return;
    }

    // Header tampering may raise the iteration count; skip expensive inputs.
    if let Ok(parsed) = Envelope::from_bytes(&bytes) {
        if parsed.header.iterations > 64 {
            return;
        }
    }

    let tampered = Envelope::from_bytes(&bytes).map(|e| e.to_base64());
    if let Ok(text) = tampered {
        assert_eq!(decrypt(&text, PASSPHRASE), None, "tampered envelope authenticated");
    }
});
