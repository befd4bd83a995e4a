//! Argon2 work moved off the async executor.
//!
//! Every hash and verification runs on tokio's blocking pool; a slow hash
//! on a request worker would stall every other request on that thread.

use common::{AppError, AppResult};
use domain::{Password, SecretHash};

async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal(format!("Blocking hash task failed: {e}")))
}

/// Hash a new password.
pub async fn hash_password(plain: String) -> AppResult<Password> {
    Ok(blocking(move || Password::new(&plain)).await??)
}

pub async fn verify_password(hash: String, candidate: String) -> AppResult<bool> {
    blocking(move || Password::from_hash(hash).verify(&candidate)).await
}

pub async fn hash_secret(plain: String) -> AppResult<SecretHash> {
    Ok(blocking(move || SecretHash::generate(&plain)).await??)
}

pub async fn verify_secret(hash: String, candidate: String) -> AppResult<bool> {
    blocking(move || SecretHash::from_hash(hash).verify(&candidate)).await
}

/// Burn one verification's worth of time when there is no stored hash.
pub async fn verify_dummy(candidate: String) -> AppResult<bool> {
    blocking(move || SecretHash::verify_dummy(&candidate)).await
}
