//! Account passwords: Argon2id hashing and the registration length rule.
//!
//! Stored hashes are PHC strings, so the salt and cost parameters travel
//! with each hash and older rows keep verifying if the defaults change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password accepted at registration, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a new account password with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check a login attempt against the stored hash.
///
/// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Enforce the registration length rule, counting characters not bytes.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() >= min_length {
        return Ok(());
    }
    Err(format!("Password must be at least {min_length} characters long"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_accepts_only_the_original_password() {
        let stored = hash_password("quarterly-review-2026").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("quarterly-review-2026", &stored).unwrap());
        assert!(!verify_password("quarterly-review-2025", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = hash_password("same-secret").unwrap();
        let second = hash_password("same-secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("anything", "plaintext-in-the-db").is_err());
    }

    #[test]
    fn length_rule_counts_characters() {
        let msg = validate_password_strength("seven77", MIN_PASSWORD_LENGTH).unwrap_err();
        assert_eq!(msg, "Password must be at least 8 characters long");
        assert!(validate_password_strength("eight888", MIN_PASSWORD_LENGTH).is_ok());
        // Four two-byte characters: eight bytes, still too short.
        assert!(validate_password_strength("éééé", MIN_PASSWORD_LENGTH).is_err());
    }
}
