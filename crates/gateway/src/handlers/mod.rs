//! HTTP handlers.

pub mod auth_handler;
pub mod blog_handler;
pub mod health_handler;

pub use auth_handler::{auth_routes, refresh_routes, session_routes};
pub use blog_handler::blog_routes;
pub use health_handler::health_routes;
