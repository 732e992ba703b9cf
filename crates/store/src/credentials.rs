//! Password hashing.
//!
//! Passwords are stored as Argon2id PHC strings (`$argon2id$v=19$...`) with a
//! random 16-byte salt per hash.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::db::RepositoryError;

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `RepositoryError::Credential` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, RepositoryError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|_| RepositoryError::Credential)?;
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| RepositoryError::Credential)
}

/// Verify a password against a stored hash.
///
/// Returns `false` for a wrong password and for a hash that cannot be parsed.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Whether a stored value looks like a PHC hash rather than plaintext.
#[must_use]
pub fn is_hashed(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}
