//! Password hashing
//!
//! Hashes are Argon2id PHC strings with a per-password random salt.
//! Verification goes through the argon2 verifier, which compares digests in
//! constant time.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::sync::OnceLock;
use tracing::warn;

use crate::error::{AuthError, AuthResult};

/// Hash a plaintext password with a fresh salt
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a plaintext password against a stored PHC hash.
///
/// A stored hash that cannot be parsed never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Burn the same KDF work as a real verification.
///
/// Used when the username does not exist so that the response time does not
/// reveal whether an account is registered.
pub fn verify_against_dummy(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("dummy-password-for-timing").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("Correct horse battery staple", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same password", &first));
        assert!(verify_password("same password", &second));
    }

    #[test]
    fn test_unparseable_hash_never_matches() {
        assert!(!verify_password("anything", "plaintext-not-a-hash"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_dummy_verification_is_callable_repeatedly() {
        verify_against_dummy("first");
        verify_against_dummy("second");
    }
}
