//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ROLE_USER;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Hash of the most recently issued refresh token (None = signed out)
    #[serde(skip_serializing)]
    pub refresh_token_hash: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Role tags, stored and embedded in token claims as-is
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether a refresh token is currently outstanding
    pub fn has_session(&self) -> bool {
        self.refresh_token_hash.is_some()
    }
}

/// Data needed to persist a new account (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

impl NewUser {
    /// New account with the default role
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            email,
            password_hash,
            first_name,
            last_name,
            roles: vec![ROLE_USER.to_string()],
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Role tags
    pub roles: Vec<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: user.roles,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.roles.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(roles: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
            password_hash: "hashed".to_string(),
            refresh_token_hash: None,
            first_name: "Ada".to_string(),
            last_name: "Reader".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_user_gets_default_role() {
        let user = NewUser::new(
            "a@x.com".to_string(),
            "hash".to_string(),
            "A".to_string(),
            "B".to_string(),
        );
        assert_eq!(user.roles, vec!["user".to_string()]);
    }

    #[test]
    fn test_response_keeps_unknown_role_tags() {
        let mut user = user_with_roles(&["editor", "moderator"]);
        user.refresh_token_hash = Some("rt-hash".to_string());
        assert!(user.has_session());

        let response = UserResponse::from(&user);
        assert_eq!(response.roles, vec!["editor".to_string(), "moderator".to_string()]);
        assert_eq!(response.email, user.email);

        let owned = UserResponse::from(user);
        assert_eq!(owned.roles, response.roles);
    }
}
