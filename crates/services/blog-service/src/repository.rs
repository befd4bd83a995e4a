//! Outbound port to blog and comment storage.

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppResult, PaginationParams};
use domain::{Blog, BlogAuthor, BlogChanges, Comment, NewBlog, NewComment};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Blog repository trait for dependency injection.
///
/// Paged queries return the page's rows together with the total row count.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Create a new blog post
    async fn create(&self, author_id: Uuid, blog: NewBlog) -> AppResult<Blog>;

    /// Find blog by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Blog>>;

    /// Find blog by ID together with its author
    async fn find_with_author(&self, id: i32) -> AppResult<Option<(Blog, BlogAuthor)>>;

    /// One page of an author's blogs, newest first
    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<Blog>, u64)>;

    /// One page of all blogs with their authors, newest first
    async fn list_with_authors(
        &self,
        page: PaginationParams,
    ) -> AppResult<(Vec<(Blog, BlogAuthor)>, u64)>;

    /// Atomically bump the view counter; false if the blog does not exist
    async fn increment_views(&self, id: i32) -> AppResult<bool>;

    /// Apply a partial update
    async fn update(&self, id: i32, changes: BlogChanges) -> AppResult<Blog>;

    /// Delete a blog and its comments
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Store a comment
    async fn add_comment(&self, comment: NewComment) -> AppResult<Comment>;

    /// Comments of a blog, oldest first
    async fn comments_for(&self, blog_id: i32) -> AppResult<Vec<Comment>>;
}
