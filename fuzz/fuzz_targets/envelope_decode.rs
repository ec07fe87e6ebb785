//! Fuzz target for envelope parsing
//!
//! Feeds arbitrary bytes into `Envelope::from_bytes` and arbitrary text into
//! `Envelope::from_base64`. Tests:
//!
//! - Truncated headers and bodies
//! - Unknown version and content-kind bytes
//! - Zero and oversized iteration counts
//! - Non-canonical base64
//!
//! The fuzzer should NEVER panic. Parsed envelopes must re-encode to the
//! same bytes.

#![no_main]

use keepsake_crypto::{Envelope, MAX_ITERATIONS};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::from_bytes(data) {
        assert!(envelope.header.iterations >= 1);
        assert!(envelope.header.iterations <= MAX_ITERATIONS);
        assert_eq!(envelope.to_bytes(), data);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(envelope) = Envelope::from_base64(text) {
            assert_eq!(envelope.to_base64(), text);
        }
    }
});
