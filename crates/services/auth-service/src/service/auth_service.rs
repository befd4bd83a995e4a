//! Token lifecycle manager - sign up, sign in, refresh rotation, sign out.
//!
//! Each operation is a short sequential pipeline (lookup, verify, sign,
//! persist). Concurrent calls for one user are not serialized here; the
//! last refresh-hash write wins.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::hashing;
use crate::repository::UserRepository;
use crate::token::{Claims, TokenPair, TokenSigner, TokenSubject};
use crate::verifier::CredentialVerifier;
use common::{AppError, AppResult, AuthConfig};
use domain::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration payload
#[derive(Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl std::fmt::Debug for SignUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUp")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and sign it in
    async fn sign_up(&self, payload: SignUp) -> AppResult<TokenPair>;

    /// Exchange email and password for a token pair
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenPair>;

    /// Exchange the latest refresh token for a new pair
    async fn refresh_tokens(&self, user_id: Uuid, refresh_token: &str) -> AppResult<TokenPair>;

    /// Revoke the outstanding refresh token
    async fn sign_out(&self, user_id: Uuid) -> AppResult<()>;

    /// Load the profile of an authenticated user
    async fn current_user(&self, user_id: Uuid) -> AppResult<User>;

    /// Verify an access token and extract claims
    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;

    /// Verify a refresh token's signature and expiry (not its rotation state)
    fn verify_refresh_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of `AuthService`.
pub struct TokenManager {
    users: Arc<dyn UserRepository>,
    verifier: CredentialVerifier,
    signer: Arc<dyn TokenSigner>,
    config: AuthConfig,
}

impl TokenManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        verifier: CredentialVerifier,
        signer: Arc<dyn TokenSigner>,
        config: AuthConfig,
    ) -> Self {
        Self {
            users,
            verifier,
            signer,
            config,
        }
    }

    /// Sign both halves for `user` and persist the refresh hash.
    ///
    /// The pair is only returned once the hash is stored; a failed or
    /// no-op write yields an error and the tokens are dropped.
    async fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let subject = TokenSubject::from(user);
        let pair = TokenPair {
            access_token: self.signer.sign(&subject, &self.config.access)?,
            refresh_token: self.signer.sign(&subject, &self.config.refresh)?,
        };

        let hash = hashing::hash_secret(pair.refresh_token.clone()).await?;
        if !self
            .users
            .update_refresh_hash(user.id, hash.into_string())
            .await?
        {
            tracing::warn!(user_id = %user.id, "User vanished before refresh hash was stored");
            return Err(AppError::AccessDenied);
        }

        Ok(pair)
    }
}

#[async_trait]
impl AuthService for TokenManager {
    async fn sign_up(&self, payload: SignUp) -> AppResult<TokenPair> {
        if self.users.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let password = hashing::hash_password(payload.password).await?;
        let user = self
            .users
            .create(NewUser::new(
                payload.email,
                password.into_string(),
                payload.first_name,
                payload.last_name,
            ))
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");
        self.issue_tokens(&user).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let user = self
            .verifier
            .verify_password(email, password)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let pair = self.issue_tokens(&user).await?;
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(pair)
    }

    async fn refresh_tokens(&self, user_id: Uuid, refresh_token: &str) -> AppResult<TokenPair> {
        // Claims come from the stored user, so role changes apply on refresh
        let user = self
            .verifier
            .verify_refresh_token(user_id, refresh_token)
            .await?;

        let pair = self.issue_tokens(&user).await?;
        tracing::debug!(user_id = %user.id, "Token pair rotated");
        Ok(pair)
    }

    async fn sign_out(&self, user_id: Uuid) -> AppResult<()> {
        if !self.users.clear_refresh_hash(user_id).await? {
            return Err(AppError::AccessDenied);
        }

        tracing::info!(user_id = %user_id, "User signed out");
        Ok(())
    }

    async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.signer.verify(token, &self.config.access)
    }

    fn verify_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.signer.verify(token, &self.config.refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use crate::testing::{test_auth_config, InMemoryUserRepository};
    use crate::token::{JwtSigner, MockTokenSigner};
    use chrono::Utc;
    use domain::Password;
    use tokio_test::assert_ok;

    const EMAIL: &str = "a@x.com";
    const PASSWORD: &str = "password-one";

    fn manager_with(repo: Arc<dyn UserRepository>) -> TokenManager {
        TokenManager::new(
            repo.clone(),
            CredentialVerifier::new(repo),
            Arc::new(JwtSigner::new()),
            test_auth_config(),
        )
    }

    fn in_memory() -> (InMemoryUserRepository, TokenManager) {
        let repo = InMemoryUserRepository::new();
        let manager = manager_with(Arc::new(repo.clone()));
        (repo, manager)
    }

    fn sign_up_payload(email: &str) -> SignUp {
        SignUp {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    fn stored_user(id: Uuid) -> User {
        User {
            id,
            email: EMAIL.to_string(),
            password_hash: Password::new(PASSWORD).unwrap().into_string(),
            refresh_token_hash: None,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            roles: vec!["user".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_issues_matching_pair() {
        let (repo, manager) = in_memory();

        let pair = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();

        let access = manager.verify_access_token(&pair.access_token).unwrap();
        let refresh = manager.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(TokenSubject::from(&access), TokenSubject::from(&refresh));
        assert_eq!(access.email, EMAIL);
        assert_eq!(access.roles, vec!["user".to_string()]);

        let stored = repo.get(access.sub).await.unwrap();
        assert!(stored.has_session());
        assert_ne!(stored.password_hash, PASSWORD);

        assert_ok!(manager.refresh_tokens(access.sub, &pair.refresh_token).await);
    }

    #[tokio::test]
    async fn test_tokens_are_bound_to_their_secret() {
        let (_, manager) = in_memory();
        let pair = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();

        assert!(manager.verify_access_token(&pair.refresh_token).is_err());
        assert!(manager.verify_refresh_token(&pair.access_token).is_err());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let (repo, manager) = in_memory();
        manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();

        let err = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_never_writes() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(Uuid::new_v4()))));
        repo.expect_create().never();
        repo.expect_update_refresh_hash().never();

        let manager = manager_with(Arc::new(repo));
        let err = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_sign_up_accepts_any_password() {
        let (_, manager) = in_memory();
        let payload = SignUp {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        };

        let pair = manager.sign_up(payload).await.unwrap();
        assert_ok!(manager.verify_access_token(&pair.access_token));
        assert_ok!(manager.sign_in("a@x.com", "pw1").await);
    }

    #[tokio::test]
    async fn test_sign_in_success_rotates_hash() {
        let (repo, manager) = in_memory();
        let first = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();
        let user_id = manager.verify_access_token(&first.access_token).unwrap().sub;
        let hash_after_sign_up = repo.get(user_id).await.unwrap().refresh_token_hash;

        let second = manager.sign_in(EMAIL, PASSWORD).await.unwrap();
        let hash_after_sign_in = repo.get(user_id).await.unwrap().refresh_token_hash;

        assert_ne!(first, second);
        assert_ne!(hash_after_sign_up, hash_after_sign_in);

        // Signing in supersedes the sign-up refresh token
        let err = manager
            .refresh_tokens(user_id, &first.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
        assert_ok!(manager.refresh_tokens(user_id, &second.refresh_token).await);
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_indistinguishable() {
        let (_, manager) = in_memory();
        manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();

        let wrong_password = manager.sign_in(EMAIL, "password-two").await.unwrap_err();
        let unknown_email = manager.sign_in("b@x.com", PASSWORD).await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.status(), unknown_email.status());
        assert_eq!(wrong_password.user_message(), unknown_email.user_message());
    }

    #[tokio::test]
    async fn test_refresh_rotation_worked_example() {
        let (_, manager) = in_memory();
        let mut payload = sign_up_payload("a@x.com");
        payload.password = "pw1".to_string();

        let t1 = manager.sign_up(payload).await.unwrap();
        let user_id = manager.verify_refresh_token(&t1.refresh_token).unwrap().sub;

        let t2 = manager.refresh_tokens(user_id, &t1.refresh_token).await.unwrap();
        assert_ne!(t2, t1);
        assert_ne!(t2.access_token, t1.access_token);
        assert_ne!(t2.refresh_token, t1.refresh_token);

        let err = manager
            .refresh_tokens(user_id, &t1.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));

        assert_ok!(manager.refresh_tokens(user_id, &t2.refresh_token).await);
    }

    #[tokio::test]
    async fn test_sign_out_revokes_refresh_token() {
        let (repo, manager) = in_memory();
        let pair = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();
        let user_id = manager.verify_access_token(&pair.access_token).unwrap().sub;

        manager.sign_out(user_id).await.unwrap();
        assert!(!repo.get(user_id).await.unwrap().has_session());

        let err = manager
            .refresh_tokens(user_id, &pair.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));

        // Signing out twice is harmless
        assert_ok!(manager.sign_out(user_id).await);
    }

    #[tokio::test]
    async fn test_sign_out_unknown_user_denied() {
        let (_, manager) = in_memory();
        let err = manager.sign_out(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
    }

    #[tokio::test]
    async fn test_refresh_for_other_user_denied() {
        let (_, manager) = in_memory();
        let alice = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();
        let bob = manager.sign_up(sign_up_payload("b@x.com")).await.unwrap();
        let bob_id = manager.verify_access_token(&bob.access_token).unwrap().sub;

        let err = manager
            .refresh_tokens(bob_id, &alice.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
    }

    #[tokio::test]
    async fn test_hash_write_failure_returns_no_tokens() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user(user_id))));
        repo.expect_update_refresh_hash()
            .times(1)
            .returning(|_, _| Err(AppError::internal("disk full")));

        let manager = manager_with(Arc::new(repo));
        let err = manager.sign_in(EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_hash_write_on_vanished_user_returns_no_tokens() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user(user_id))));
        repo.expect_update_refresh_hash()
            .returning(|_, _| Ok(false));

        let manager = manager_with(Arc::new(repo));
        let err = manager.sign_in(EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
    }

    #[tokio::test]
    async fn test_signing_failure_propagates_before_persisting() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(stored_user(user_id))));
        repo.expect_update_refresh_hash().never();

        let mut signer = MockTokenSigner::new();
        signer
            .expect_sign()
            .returning(|_, _| Err(AppError::internal("signing key unavailable")));

        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let manager = TokenManager::new(
            repo.clone(),
            CredentialVerifier::new(repo),
            Arc::new(signer),
            test_auth_config(),
        );

        let err = manager.sign_in(EMAIL, PASSWORD).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_refresh_uses_current_roles() {
        let (repo, manager) = in_memory();
        let pair = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();
        let user_id = manager.verify_access_token(&pair.access_token).unwrap().sub;

        let mut user = repo.get(user_id).await.unwrap();
        user.roles = vec!["user".to_string(), "admin".to_string()];
        repo.put(user).await;

        let refreshed = manager
            .refresh_tokens(user_id, &pair.refresh_token)
            .await
            .unwrap();
        let claims = manager.verify_access_token(&refreshed.access_token).unwrap();
        assert_eq!(claims.roles, vec!["user".to_string(), "admin".to_string()]);
    }

    #[tokio::test]
    async fn test_role_tags_pass_through_unchanged() {
        let (repo, manager) = in_memory();
        let pair = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();
        let user_id = manager.verify_access_token(&pair.access_token).unwrap().sub;

        let tags = vec!["editor".to_string(), "moderator".to_string()];
        let mut user = repo.get(user_id).await.unwrap();
        user.roles = tags.clone();
        repo.put(user).await;

        let pair = manager.sign_in(EMAIL, PASSWORD).await.unwrap();
        let access = manager.verify_access_token(&pair.access_token).unwrap();
        let refresh = manager.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(access.roles, tags);
        assert_eq!(refresh.roles, tags);
    }

    #[tokio::test]
    async fn test_current_user() {
        let (_, manager) = in_memory();
        let pair = manager.sign_up(sign_up_payload(EMAIL)).await.unwrap();
        let user_id = manager.verify_access_token(&pair.access_token).unwrap().sub;

        let user = manager.current_user(user_id).await.unwrap();
        assert_eq!(user.email, EMAIL);

        let err = manager.current_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
