//! End-to-end tests of the HTTP surface.
//!
//! The auth routes run against a real `TokenManager` over the in-memory user
//! store; blog routes run against a mocked `BlogService`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use auth_service_lib::testing::{test_auth_config, InMemoryUserRepository};
use auth_service_lib::{CredentialVerifier, JwtSigner, TokenManager, UserRepository};
use blog_service_lib::MockBlogService;
use common::{AppError, AppResult, Paginated};
use domain::Comment;
use gateway_lib::{create_router, AppState, HealthCheck};

struct StubDatabase {
    healthy: bool,
}

#[async_trait]
impl HealthCheck for StubDatabase {
    async fn ping(&self) -> AppResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(AppError::internal("connection refused"))
        }
    }
}

fn app_with(blogs: MockBlogService, healthy: bool) -> (Router, InMemoryUserRepository) {
    let users = InMemoryUserRepository::new();
    let repo = Arc::new(users.clone());
    let auth = TokenManager::new(
        repo.clone(),
        CredentialVerifier::new(repo),
        Arc::new(JwtSigner::new()),
        test_auth_config(),
    );
    let state = AppState::new(
        Arc::new(auth),
        Arc::new(blogs),
        Arc::new(StubDatabase { healthy }),
    );
    (create_router(state), users)
}

fn app() -> Router {
    app_with(MockBlogService::new(), true).0
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn sign_up_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "password-one",
        "firstName": "Ada",
        "lastName": "Lovelace"
    })
}

async fn sign_up(app: &Router, email: &str) -> (String, String) {
    let body = Some(sign_up_body(email));
    let (status, body) = send(app, Method::POST, "/auth/signup", None, body).await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["accessToken"].as_str().unwrap().to_string(),
        body["refreshToken"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_ping() {
    let app = app();
    let response = app
        .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"pong");
}

#[tokio::test]
async fn test_health_reports_database_state() {
    let (healthy, _) = app_with(MockBlogService::new(), true);
    let (status, body) = send(&healthy, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "healthy");

    let (degraded, _) = app_with(MockBlogService::new(), false);
    let (status, body) = send(&degraded, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["error"], "An internal error occurred");
}

#[tokio::test]
async fn test_sign_up_then_me() {
    let app = app();
    let (access, _) = sign_up(&app, "a@x.com").await;

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["roles"], json!(["user"]));
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_sign_up_conflicts() {
    let app = app();
    sign_up(&app, "a@x.com").await;

    let body = Some(sign_up_body("a@x.com"));
    let (status, body) = send(&app, Method::POST, "/auth/signup", None, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = app();

    let mut body = sign_up_body("not-an-email");
    let (status, response) =
        send(&app, Method::POST, "/auth/signup", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(response["error"]["message"], "Invalid email format");

    body["email"] = json!("a@x.com");
    body["password"] = json!("short");
    let (status, response) = send(&app, Method::POST, "/auth/signup", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"]["message"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::post("/auth/signin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_in() {
    let app = app();
    sign_up(&app, "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signin",
        None,
        Some(json!({"email": "a@x.com", "password": "password-one"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["accessToken"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signin",
        None,
        Some(json!({"email": "a@x.com", "password": "password-two"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    // Unknown email looks the same as a wrong password
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signin",
        None,
        Some(json!({"email": "b@x.com", "password": "password-one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_refresh_rotation_over_http() {
    let app = app();
    let (_, r1) = sign_up(&app, "a@x.com").await;

    let (status, body) = send(&app, Method::POST, "/auth/refresh-tokens", Some(&r1), None).await;
    assert_eq!(status, StatusCode::OK);
    let r2 = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(r1, r2);

    // Replaying the superseded token is refused
    let (status, body) = send(&app, Method::POST, "/auth/refresh-tokens", Some(&r1), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACCESS_DENIED");

    let (status, _) = send(&app, Method::POST, "/auth/refresh-tokens", Some(&r2), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_tokens_only_pass_their_own_guard() {
    let app = app();
    let (access, refresh) = sign_up(&app, "a@x.com").await;

    let (status, _) = send(&app, Method::POST, "/auth/refresh-tokens", Some(&access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_sign_out_revokes_refresh() {
    let (app, users) = app_with(MockBlogService::new(), true);
    let (access, refresh) = sign_up(&app, "a@x.com").await;

    let (status, _) = send(&app, Method::POST, "/auth/signout", Some(&access), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let user = users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert!(!user.has_session());

    let (status, _) = send(&app, Method::POST, "/auth/refresh-tokens", Some(&refresh), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The access token stays valid until it expires
    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_blog_routes_require_access_token() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/blogs/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_all_blogs_passes_pagination() {
    let mut blogs = MockBlogService::new();
    blogs
        .expect_list_all()
        .withf(|page| page.page == 2 && page.page_size == 5)
        .times(1)
        .returning(|page| Ok(Paginated::new(vec![], page, 7)));

    let (app, _) = app_with(blogs, true);
    let (access, _) = sign_up(&app, "a@x.com").await;

    let uri = "/blogs/all?page=2&pageSize=5";
    let (status, body) = send(&app, Method::GET, uri, Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["totalItems"], 7);
    assert_eq!(body["meta"]["totalPages"], 2);
}

#[tokio::test]
async fn test_write_comment_uses_caller_identity() {
    let mut blogs = MockBlogService::new();
    blogs
        .expect_write_comment()
        .withf(|_, email, blog_id, content| {
            email == "a@x.com" && *blog_id == 42 && content == "Great read!"
        })
        .times(1)
        .returning(|author_id, author_email, blog_id, content| {
            Ok(Comment {
                id: 1,
                blog_id,
                author_id,
                author_email,
                content,
                created_at: Utc::now(),
            })
        });

    let (app, _) = app_with(blogs, true);
    let (access, _) = sign_up(&app, "a@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/blogs/42/comment",
        Some(&access),
        Some(json!({"content": "Great read!"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["blogId"], 42);
    assert_eq!(body["authorEmail"], "a@x.com");
}

#[tokio::test]
async fn test_missing_blog_is_not_found() {
    let mut blogs = MockBlogService::new();
    blogs
        .expect_view()
        .returning(|_| Err(AppError::not_found("Blog")));

    let (app, _) = app_with(blogs, true);
    let (access, _) = sign_up(&app, "a@x.com").await;

    let (status, body) = send(&app, Method::GET, "/blogs/9/view", Some(&access), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Blog not found.");
}
