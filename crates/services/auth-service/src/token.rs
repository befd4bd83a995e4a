//! Token signing - JWT claims, token pairs and the signer port.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, TokenSettings};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload, shared by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id; two tokens issued in the same second still differ
    pub jti: Uuid,
}

/// Identity encoded into both halves of a token pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<&User> for TokenSubject {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}

impl From<&Claims> for TokenSubject {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
            roles: claims.roles.clone(),
        }
    }
}

/// Access and refresh token issued together
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Token signer trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenSigner: Send + Sync {
    /// Sign a fresh token for `subject` with the given secret and lifetime
    fn sign(&self, subject: &TokenSubject, settings: &TokenSettings) -> AppResult<String>;

    /// Check signature and expiry, returning the embedded claims
    fn verify(&self, token: &str, settings: &TokenSettings) -> AppResult<Claims>;
}

/// HS256 JWT implementation of `TokenSigner`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtSigner;

impl JwtSigner {
    pub fn new() -> Self {
        Self
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, subject: &TokenSubject, settings: &TokenSettings) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + settings.lifetime;

        let claims = Claims {
            sub: subject.user_id,
            email: subject.email.clone(),
            roles: subject.roles.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(settings.secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
    }

    fn verify(&self, token: &str, settings: &TokenSettings) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(settings.secret.as_bytes()),
            &Self::validation(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn settings(secret: &str, lifetime: Duration) -> TokenSettings {
        TokenSettings {
            secret: secret.to_string(),
            lifetime,
        }
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            roles: vec!["user".to_string()],
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = JwtSigner::new();
        let access = settings("access-secret-access-secret-access-secret", Duration::minutes(15));
        let subject = subject();

        let token = signer.sign(&subject, &access).unwrap();
        let claims = signer.verify(&token, &access).unwrap();

        assert_eq!(TokenSubject::from(&claims), subject);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_tokens_are_unique() {
        let signer = JwtSigner::new();
        let access = settings("access-secret-access-secret-access-secret", Duration::minutes(15));
        let subject = subject();

        let first = signer.sign(&subject, &access).unwrap();
        let second = signer.sign(&subject, &access).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = JwtSigner::new();
        let access = settings("access-secret-access-secret-access-secret", Duration::minutes(15));
        let refresh = settings("refresh-secret-refresh-secret-refresh-secret", Duration::hours(1));

        let token = signer.sign(&subject(), &refresh).unwrap();
        let err = signer.verify(&token, &access).unwrap_err();
        assert!(matches!(err, AppError::Jwt(_)));
        assert_eq!(err.status().as_u16(), 401);
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = JwtSigner::new();
        let expired = settings("access-secret-access-secret-access-secret", Duration::seconds(-5));

        let token = signer.sign(&subject(), &expired).unwrap();
        assert!(signer.verify(&token, &expired).is_err());
    }

    #[test]
    fn test_token_pair_debug_redacted() {
        let pair = TokenPair {
            access_token: "aaa.bbb.ccc".to_string(),
            refresh_token: "ddd.eee.fff".to_string(),
        };
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("aaa.bbb.ccc"));

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "aaa.bbb.ccc");
        assert_eq!(json["refreshToken"], "ddd.eee.fff");
    }
}
