//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use auth_service_lib::{SignUp, TokenPair};
use common::AppResult;
use domain::UserResponse;

use crate::extractors::ValidatedJson;
use crate::middleware::{CurrentUser, RefreshCredentials};
use crate::state::AppState;

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

impl From<SignUpRequest> for SignUp {
    fn from(request: SignUpRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
        }
    }
}

/// Sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Access and refresh token pair
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    /// Short-lived token for API calls
    pub access_token: String,
    /// Long-lived token, valid until the next token pair is issued
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
}

/// Routes behind the access guard
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/signout", post(sign_out))
        .route("/me", get(me))
}

/// Routes behind the refresh guard
pub fn refresh_routes() -> Router<AppState> {
    Router::new().route("/refresh-tokens", post(refresh_tokens))
}

/// Register a new account and sign it in
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = TokenPairResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email is already taken")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<(StatusCode, Json<TokenPairResponse>)> {
    let pair = state.auth_service.sign_up(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(pair.into())))
}

/// Exchange credentials for a token pair
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenPairResponse),
        (status = 401, description = "Email or password is incorrect")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<TokenPairResponse>> {
    let pair = state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(pair.into()))
}

/// Rotate the refresh token
#[utoipa::path(
    post,
    path = "/auth/refresh-tokens",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New token pair", body = TokenPairResponse),
        (status = 401, description = "Missing, malformed or expired refresh token"),
        (status = 403, description = "Refresh token is not the latest one issued")
    )
)]
pub async fn refresh_tokens(
    Extension(credentials): Extension<RefreshCredentials>,
    State(state): State<AppState>,
) -> AppResult<Json<TokenPairResponse>> {
    let pair = state
        .auth_service
        .refresh_tokens(credentials.user_id, &credentials.refresh_token)
        .await?;

    Ok(Json(pair.into()))
}

/// Revoke the outstanding refresh token
#[utoipa::path(
    post,
    path = "/auth/signout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn sign_out(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<StatusCode> {
    state.auth_service.sign_out(current_user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get the signed-in user's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.current_user(current_user.id).await?;

    Ok(Json(UserResponse::from(user)))
}
