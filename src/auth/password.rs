//! argon2id password hashing. Hashes are stored as PHC strings, so the
//! salt and parameters travel with the hash.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
#[error("password hash: {0}")]
pub struct PasswordError(password_hash::Error);

pub fn hash(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hashing failed");
            PasswordError(e)
        })
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unusable.
pub fn verify(plain: &str, phc: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(phc).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        PasswordError(e)
    })?;

    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "argon2 verification failed");
            Err(PasswordError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_salted_phc() {
        let first = hash("Secur3P@ssw0rd!").unwrap();
        let second = hash("Secur3P@ssw0rd!").unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify("Secur3P@ssw0rd!", &first).unwrap());
        assert!(verify("Secur3P@ssw0rd!", &second).unwrap());
    }

    #[test]
    fn mismatch_is_false_not_error() {
        let phc = hash("correct-horse-battery-staple").unwrap();
        assert!(!verify("wrong-password", &phc).unwrap());
    }

    #[test]
    fn malformed_hash_is_error() {
        assert!(verify("anything", "not-a-valid-hash").is_err());
    }
}
