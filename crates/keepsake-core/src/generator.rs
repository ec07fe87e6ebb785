//! Random password generation.

use keepsake_crypto::Entropy;

/// Characters drawn from: letters, digits and ASCII punctuation.
pub const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Length used when the caller has no preference.
pub const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Largest byte value that maps uniformly onto the charset.
const ACCEPT_BELOW: usize = 256 - 256 % PASSWORD_CHARSET.len();

/// Generate a password of `length` characters from [`PASSWORD_CHARSET`].
///
/// Bytes are drawn from `entropy` and rejected when they would bias the
/// distribution, so every character is equally likely.
pub fn generate_password(entropy: &impl Entropy, length: usize) -> String {
    let mut password = String::with_capacity(length);
    let mut buffer = [0u8; 64];

    while password.len() < length {
        entropy.fill(&mut buffer);
        for &byte in &buffer {
            if password.len() == length {
                break;
            }
            let byte = usize::from(byte);
            if byte < ACCEPT_BELOW {
                password.push(char::from(PASSWORD_CHARSET[byte % PASSWORD_CHARSET.len()]));
            }
        }
    }

    password
}
