//! Slow, salted hashing for stored secrets.
//!
//! Passwords and refresh tokens are both stored as Argon2id PHC strings.
//! Verification goes through `password-hash`, whose output comparison is
//! constant-time, so a mismatch position never shows up in timing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::error::{DomainError, DomainResult};

/// Hash verified when there is nothing real to compare against, so that
/// "no such user" costs as much as "wrong secret".
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash("placeholder-secret-that-never-matches").ok());

/// Hash of a secret (refresh token, API credential) ready for storage.
#[derive(Clone)]
pub struct SecretHash {
    hash: String,
}

impl std::fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHash")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl SecretHash {
    /// Hash a plain secret with a fresh salt.
    pub fn generate(plain: &str) -> DomainResult<Self> {
        Ok(Self { hash: hash(plain)? })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a plain secret against this hash.
    ///
    /// Malformed stored hashes never match.
    pub fn verify(&self, plain: &str) -> bool {
        verify(plain, &self.hash)
    }

    /// Spend one verification's worth of work and report no match.
    pub fn verify_dummy(plain: &str) -> bool {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = verify(plain, dummy);
        }
        false
    }
}

impl From<SecretHash> for String {
    fn from(secret: SecretHash) -> Self {
        secret.hash
    }
}

pub(crate) fn hash(plain: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| DomainError::hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Recompute the Argon2 output for `plain` and compare it with the stored
/// one. The comparison is `password_hash::Output`'s `PartialEq`, which runs
/// in constant time; the candidate itself is never compared byte-wise,
/// only its fixed-length digest is.
pub(crate) fn verify(plain: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => argon2().verify_password(plain.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

#[inline]
fn argon2() -> Argon2<'static> {
    Argon2::default()
}
