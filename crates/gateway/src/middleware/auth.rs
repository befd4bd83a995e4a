//! Authentication middleware.
//!
//! Two bearer guards share the same header parsing: the access guard checks
//! tokens against the access secret, the refresh guard against the refresh
//! secret. Which one a route uses is decided in `routes.rs`.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::constants::{BEARER_TOKEN_PREFIX, ROLE_ADMIN};

use crate::state::AppState;

/// Current authenticated user extracted from an access token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    /// Role tags exactly as carried in the token
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// Check if the user carries `role` (admins satisfy every role).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|own| own == role || own == ROLE_ADMIN)
    }
}

/// Refresh token presented on the refresh route, with the user it names.
#[derive(Clone)]
pub struct RefreshCredentials {
    pub user_id: Uuid,
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCredentials")
            .field("user_id", &self.user_id)
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Reject callers lacking `role`.
pub fn require_role(user: &CurrentUser, role: &str) -> AppResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}

/// Access guard: validates the bearer access token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?;
    let claims = state.auth_service.verify_access_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        roles: claims.roles,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Refresh guard: validates the bearer refresh token and keeps it for the
/// handler, which still has to match it against the stored hash.
pub async fn refresh_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)?.to_string();
    let claims = state.auth_service.verify_refresh_token(&token)?;

    request.extensions_mut().insert(RefreshCredentials {
        user_id: claims.sub,
        refresh_token: token,
    });

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extract_token() {
        let request = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token(&request).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_token_rejects_malformed_headers() {
        for header in [None, Some("abc.def.ghi"), Some("Basic abc"), Some("Bearer ")] {
            let request = request_with(header);
            assert!(matches!(extract_token(&request), Err(AppError::Unauthorized)));
        }
    }

    #[test]
    fn test_require_role() {
        let user = CurrentUser {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            roles: vec!["user".to_string(), "editor".to_string()],
        };
        assert!(require_role(&user, "user").is_ok());
        assert!(require_role(&user, "editor").is_ok());
        assert!(matches!(
            require_role(&user, "admin"),
            Err(AppError::AccessDenied)
        ));

        let admin = CurrentUser {
            roles: vec!["admin".to_string()],
            ..user
        };
        assert!(require_role(&admin, "user").is_ok());
        assert!(require_role(&admin, "moderator").is_ok());
    }
}
