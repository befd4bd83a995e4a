//! Credential verifier - proves possession of a password or refresh token.

use std::sync::Arc;

use uuid::Uuid;

use crate::hashing;
use crate::repository::UserRepository;
use common::{AppError, AppResult};
use domain::User;

/// Checks secrets against the stored hashes, never comparing plaintext.
///
/// Every path that has no real hash to check still performs a dummy
/// verification, so timing does not reveal whether an account exists.
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserRepository>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Look up `email` and check `candidate` against its password hash.
    ///
    /// `Ok(None)` means "no match" (unknown email or wrong password); the
    /// caller decides how to report it.
    pub async fn verify_password(&self, email: &str, candidate: &str) -> AppResult<Option<User>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            hashing::verify_dummy(candidate.to_string()).await?;
            return Ok(None);
        };

        let matches =
            hashing::verify_password(user.password_hash.clone(), candidate.to_string()).await?;

        Ok(matches.then_some(user))
    }

    /// Check `candidate` against the refresh-token hash stored for `user_id`.
    ///
    /// A missing user, a signed-out user and a mismatching token all fail
    /// with the same `AccessDenied`.
    pub async fn verify_refresh_token(&self, user_id: Uuid, candidate: &str) -> AppResult<User> {
        let user = self.users.find_by_id(user_id).await?;

        let stored_hash = user.as_ref().and_then(|u| u.refresh_token_hash.clone());
        let matches = match stored_hash {
            Some(hash) => hashing::verify_secret(hash, candidate.to_string()).await?,
            None => hashing::verify_dummy(candidate.to_string()).await?,
        };

        match user {
            Some(user) if matches => Ok(user),
            _ => {
                tracing::debug!(user_id = %user_id, "Refresh token rejected");
                Err(AppError::AccessDenied)
            }
        }
    }
}
