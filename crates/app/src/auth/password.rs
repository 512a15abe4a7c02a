//! Argon2id password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::auth::AuthServiceError;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub(crate) fn validate_password(password: &str) -> Result<(), AuthServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthServiceError::WeakPassword);
    }

    Ok(())
}

pub(crate) fn hash_password(password: &str) -> Result<String, AuthServiceError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthServiceError::PasswordHash)
}

pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthServiceError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthServiceError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthServiceError::InvalidCredentials)
}
