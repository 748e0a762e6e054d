//! Argon2id password hashing. Hashes are stored as PHC strings.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failure.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The hasher rejected the input.
    #[error("failed to hash password: {0}")]
    Hash(password_hash::Error),

    /// The stored hash is not a PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    Verify(password_hash::Error),
}

fn hasher() -> Argon2<'static> {
    Argon2::default()
}

/// Hashes a password with a fresh random salt.
///
/// ```
/// use fintrack_core::auth::hash_password;
///
/// let hash = hash_password("correct horse").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

/// Checks a login attempt against a stored hash. A wrong password is
/// `Ok(false)`.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e)),
    }
}
