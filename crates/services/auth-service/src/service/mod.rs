//! Token lifecycle business logic.

mod auth_service;

pub use auth_service::{AuthService, SignUp, TokenManager};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
