//! Password policy and Argon2 hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Rejects passwords shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// PHC-format Argon2id hash with a fresh random salt.
pub fn hash_password(plain: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            AppError::Internal(anyhow::anyhow!("password hashing failed: {e}"))
        })
}

/// `Ok(false)` on a mismatch; an unparseable stored hash is an internal error.
pub fn verify_password(plain: &str, stored: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        AppError::Internal(anyhow::anyhow!("malformed password hash: {e}"))
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_password_verifies() {
        let hash = hash_password("vocabulario-123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("vocabulario-123", &hash).unwrap());
        assert!(!verify_password("vocabulario-124", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_internal() {
        let err = verify_password("anything", "plaintext").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(
            validate_password("1234567"),
            Err(AppError::BadRequest(_))
        ));
        assert!(validate_password("12345678").is_ok());
        // Counted in characters, not bytes.
        assert!(validate_password("ñññññññ").is_err());
    }
}
