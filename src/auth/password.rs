//! Password digests (Argon2, PHC string format)
//!
//! `verify_password` never reports a mismatch as an error: a wrong secret is
//! `Ok(false)`. Only a digest that cannot be interpreted at all is an error,
//! since that points at corrupted account data rather than a bad login.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::{Result, SpectrumError};

/// Hash a secret with a fresh random salt
pub fn hash_password(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SpectrumError::SystemError(format!("Failed to hash password: {}", e)))
}

/// Check a presented secret against a stored digest.
///
/// The output comparison inside argon2 is constant-time.
pub fn verify_password(secret: &str, digest: &str) -> Result<bool> {
    let parsed = PasswordHash::new(digest)
        .map_err(|e| SpectrumError::MalformedDigest(e.to_string()))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(SpectrumError::MalformedDigest(e.to_string())),
    }
}

/// Run `hash_password` on the blocking pool
pub async fn hash_password_blocking(secret: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&secret))
        .await
        .map_err(|e| SpectrumError::SystemError(format!("Hashing task failed: {}", e)))?
}

/// Run `verify_password` on the blocking pool
pub async fn verify_password_blocking(secret: String, digest: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&secret, &digest))
        .await
        .map_err(|e| SpectrumError::SystemError(format!("Verification task failed: {}", e)))?
}
