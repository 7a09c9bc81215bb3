//! Stateless password hashing and verification (Argon2id).
//!
//! Verification is a plain function over (stored hash, candidate) —
//! no behavior is attached to fetched user records, and no reusable
//! credential is kept anywhere outside the record's PHC string.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use anyhow::{Result, anyhow};

/// Hash a password into an Argon2id PHC string (salt embedded).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("failed to hash password: {e}"))
}

/// Verify a candidate password against a stored PHC string.
///
/// A malformed stored hash verifies as false rather than erroring —
/// login against a damaged record degrades to rejection.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok()
}
