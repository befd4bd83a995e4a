//! Blog Service Library
//!
//! Blog and comment use cases. Storage sits behind `BlogRepository`;
//! comment notifications go out through the `CommentNotifier` port.

pub mod notifier;
pub mod repository;
pub mod service;

pub use notifier::{CommentAdded, CommentNotifier};
pub use repository::BlogRepository;
pub use service::{BlogManager, BlogService};

#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockCommentNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use repository::MockBlogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use service::MockBlogService;
