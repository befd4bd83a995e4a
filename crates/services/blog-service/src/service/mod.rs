//! Blog business logic.

mod blog_service;

pub use blog_service::{BlogManager, BlogService};

#[cfg(any(test, feature = "test-utils"))]
pub use blog_service::MockBlogService;
