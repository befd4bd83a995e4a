//! Outbound port to user storage.

use async_trait::async_trait;
use uuid::Uuid;

use common::AppResult;
use domain::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Refresh-hash writes are single-row updates. They report whether a row
/// was touched so callers can tell a vanished user from a successful write.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create a new user.
    ///
    /// Fails with `AppError::DuplicateEmail` if the email is already taken.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Overwrite the stored refresh-token hash
    async fn update_refresh_hash(&self, id: Uuid, hash: String) -> AppResult<bool>;

    /// Remove the stored refresh-token hash
    async fn clear_refresh_hash(&self, id: Uuid) -> AppResult<bool>;
}
