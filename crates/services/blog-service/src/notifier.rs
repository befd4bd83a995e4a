//! Outbound notification port for new comments.

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A comment was stored on someone's blog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAdded {
    pub blog_id: i32,
    /// Address of the blog's author, the recipient
    pub author_email: String,
}

/// Comment notifier trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommentNotifier: Send + Sync {
    async fn comment_added(&self, event: CommentAdded) -> AppResult<()>;
}
