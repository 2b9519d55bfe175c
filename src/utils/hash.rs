use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hashes a plaintext password with Argon2id and a fresh random salt.
/// The result is a self-describing PHC string (algorithm, params, salt, hash).
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("argon2 hash_password error: {}", e);
            AppError::InternalServerError(e.to_string())
        })
}

/// Returns `Ok(false)` on mismatch. A stored hash that cannot be parsed is an
/// internal error, not a failed login.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!("stored password hash is unreadable: {}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
