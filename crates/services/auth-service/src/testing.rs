//! In-memory collaborators for tests of this crate and of its callers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository::UserRepository;
use common::{AppError, AppResult, AuthConfig, TokenSettings};
use domain::{NewUser, User};

/// `UserRepository` backed by a map, with the same uniqueness and
/// row-affected semantics as the database store.
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored user
    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Insert or replace a user as-is
    pub async fn put(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            refresh_token_hash: None,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: user.roles,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_refresh_hash(&self, id: Uuid, hash: String) -> AppResult<bool> {
        let mut users = self.users.write().await;
        Ok(match users.get_mut(&id) {
            Some(user) => {
                user.refresh_token_hash = Some(hash);
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn clear_refresh_hash(&self, id: Uuid) -> AppResult<bool> {
        let mut users = self.users.write().await;
        Ok(match users.get_mut(&id) {
            Some(user) => {
                user.refresh_token_hash = None;
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }
}

/// Token configuration with fixed test secrets.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        access: TokenSettings {
            secret: "test-access-secret-test-access-secret".to_string(),
            lifetime: chrono::Duration::minutes(15),
        },
        refresh: TokenSettings {
            secret: "test-refresh-secret-test-refresh-secret".to_string(),
            lifetime: chrono::Duration::hours(168),
        },
    }
}
