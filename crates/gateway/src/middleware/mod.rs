//! Middleware for bearer-token authentication.

mod auth;

pub use auth::{
    auth_middleware, refresh_middleware, require_role, CurrentUser, RefreshCredentials,
};
