//! Signing-secret generation for `setup-env`

use rand::Rng;

/// Random bytes behind a generated secret (64 hex chars)
pub const SECRET_KEY_BYTES: usize = 32;

/// Generate a hex-encoded secret key from the thread-local CSPRNG
pub fn generate_secret_key() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: [u8; SECRET_KEY_BYTES] = rng.gen();
    hex::encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_hex_of_expected_length() {
        let key = generate_secret_key();
        assert_eq!(key.len(), SECRET_KEY_BYTES * 2);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate_secret_key(), generate_secret_key());
    }
}
