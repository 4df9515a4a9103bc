//! Password value object - the credential hasher.
//!
//! Hashes with Argon2id at a fixed work factor
//! (`m = 19456 KiB, t = 2, p = 1`, version 0x13) and a fresh 16-byte salt
//! from the OS RNG. The output is a PHC string, so the parameters travel
//! with every stored hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::{
    ARGON2_MEMORY_COST_KIB, ARGON2_PARALLELISM, ARGON2_TIME_COST, MAX_PASSWORD_BYTES,
};
use crate::error::{DomainError, DomainResult};

/// Password value object that handles hashing and verification.
///
/// Holds only the hash, never the plain text.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns [`DomainError::Password`] if the input is longer than
    /// [`MAX_PASSWORD_BYTES`] or the primitive fails.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.len() > MAX_PASSWORD_BYTES {
            return Err(DomainError::password(format!(
                "password exceeds {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from the account store).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("invalid hash format: {}", e)))?;
        Ok(Self::argon2()?
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    /// Argon2id with the fixed work factor.
    fn argon2() -> DomainResult<Argon2<'static>> {
        let params = Params::new(
            ARGON2_MEMORY_COST_KIB,
            ARGON2_TIME_COST,
            ARGON2_PARALLELISM,
            None,
        )
        .map_err(|e| DomainError::internal(format!("invalid argon2 params: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
