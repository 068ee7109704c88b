//! Password hashing.
//!
//! Argon2id with the crate's default cost parameters. The salt and parameters
//! are embedded in the PHC string, so verification needs only the stored hash.
//! Both operations are deliberately slow; call them from a blocking context.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Longest accepted plaintext, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("stored password hash is corrupt")]
    CorruptHash,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Hashing the same plaintext twice yields two different strings; both
    /// verify against the plaintext.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        check_input(plaintext)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext against a stored hash in constant time.
    ///
    /// A mismatch is `Ok(false)`; only a structurally invalid `stored` hash is
    /// an error.
    pub fn verify(&self, plaintext: &str, stored: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(stored).map_err(|_| HashError::CorruptHash)?;

        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be evaluated");
                Err(HashError::CorruptHash)
            }
        }
    }
}

fn check_input(plaintext: &str) -> Result<(), HashError> {
    if plaintext.is_empty() {
        return Err(HashError::InvalidInput("password must not be empty"));
    }
    if plaintext.len() > MAX_PASSWORD_BYTES {
        return Err(HashError::InvalidInput("password is too long"));
    }
    Ok(())
}
