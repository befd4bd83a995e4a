//! Blog service - Blog ownership, listing, views and comments.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::notifier::{CommentAdded, CommentNotifier};
use crate::repository::BlogRepository;
use common::{AppError, AppResult, OptionExt, Paginated, PaginationParams};
use domain::{
    Blog, BlogChanges, BlogDetail, BlogListing, BlogSummary, Comment, CommentView, NewBlog,
    NewComment,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const BLOG: &str = "Blog";

/// Blog service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BlogService: Send + Sync {
    /// Create a blog owned by `author_id`
    async fn create(&self, author_id: Uuid, blog: NewBlog) -> AppResult<Blog>;

    /// The caller's own blogs, without article bodies
    async fn list_mine(
        &self,
        author_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<Paginated<BlogSummary>>;

    /// Everyone's blogs with author names, without article bodies
    async fn list_all(&self, page: PaginationParams) -> AppResult<Paginated<BlogListing>>;

    /// One of the caller's blogs with its comments
    async fn find_one(&self, author_id: Uuid, id: i32) -> AppResult<BlogDetail>;

    /// Read any blog, counting the view
    async fn view(&self, id: i32) -> AppResult<BlogListing>;

    /// Partially update one of the caller's blogs
    async fn update(&self, author_id: Uuid, id: i32, changes: BlogChanges) -> AppResult<Blog>;

    /// Delete one of the caller's blogs, returning it
    async fn remove(&self, author_id: Uuid, id: i32) -> AppResult<Blog>;

    /// Comment on any blog and notify its author
    async fn write_comment(
        &self,
        commenter_id: Uuid,
        commenter_email: String,
        blog_id: i32,
        content: String,
    ) -> AppResult<Comment>;
}

/// Concrete implementation of `BlogService`.
pub struct BlogManager {
    blogs: Arc<dyn BlogRepository>,
    notifier: Arc<dyn CommentNotifier>,
}

impl BlogManager {
    pub fn new(blogs: Arc<dyn BlogRepository>, notifier: Arc<dyn CommentNotifier>) -> Self {
        Self { blogs, notifier }
    }

    /// Blog `id` if it exists and belongs to `author_id`.
    ///
    /// Someone else's blog reports the same `NotFound` as a missing one.
    async fn owned_blog(&self, author_id: Uuid, id: i32) -> AppResult<Blog> {
        self.blogs
            .find_by_id(id)
            .await?
            .filter(|blog| blog.author_id == author_id)
            .ok_or_not_found(BLOG)
    }
}

#[async_trait]
impl BlogService for BlogManager {
    async fn create(&self, author_id: Uuid, blog: NewBlog) -> AppResult<Blog> {
        blog.validate()?;

        let blog = self.blogs.create(author_id, blog).await?;
        tracing::info!(blog_id = blog.id, author_id = %author_id, "Blog created");
        Ok(blog)
    }

    async fn list_mine(
        &self,
        author_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<Paginated<BlogSummary>> {
        let page = page.normalized();
        let (blogs, total) = self.blogs.list_by_author(author_id, page).await?;

        Ok(Paginated::new(blogs, page, total).map(BlogSummary::from))
    }

    async fn list_all(&self, page: PaginationParams) -> AppResult<Paginated<BlogListing>> {
        let page = page.normalized();
        let (rows, total) = self.blogs.list_with_authors(page).await?;

        Ok(Paginated::new(rows, page, total)
            .map(|(blog, author)| BlogListing::summary(blog, author)))
    }

    async fn find_one(&self, author_id: Uuid, id: i32) -> AppResult<BlogDetail> {
        let blog = self.owned_blog(author_id, id).await?;
        let comments = self.blogs.comments_for(id).await?;

        Ok(BlogDetail {
            blog,
            comments: comments.into_iter().map(CommentView::from).collect(),
        })
    }

    async fn view(&self, id: i32) -> AppResult<BlogListing> {
        if !self.blogs.increment_views(id).await? {
            return Err(AppError::not_found(BLOG));
        }

        let (blog, author) = self.blogs.find_with_author(id).await?.ok_or_not_found(BLOG)?;
        Ok(BlogListing::full(blog, author))
    }

    async fn update(&self, author_id: Uuid, id: i32, changes: BlogChanges) -> AppResult<Blog> {
        changes.validate()?;
        let blog = self.owned_blog(author_id, id).await?;

        if changes.is_empty() {
            return Ok(blog);
        }

        let blog = self.blogs.update(id, changes).await?;
        tracing::info!(blog_id = id, "Blog updated");
        Ok(blog)
    }

    async fn remove(&self, author_id: Uuid, id: i32) -> AppResult<Blog> {
        let blog = self.owned_blog(author_id, id).await?;
        self.blogs.delete(id).await?;

        tracing::info!(blog_id = id, "Blog removed");
        Ok(blog)
    }

    async fn write_comment(
        &self,
        commenter_id: Uuid,
        commenter_email: String,
        blog_id: i32,
        content: String,
    ) -> AppResult<Comment> {
        let comment = NewComment::new(blog_id, commenter_id, commenter_email, content)?;

        let (_, author) = self
            .blogs
            .find_with_author(blog_id)
            .await?
            .ok_or_not_found(BLOG)?;

        let comment = self.blogs.add_comment(comment).await?;
        tracing::info!(blog_id, comment_id = comment.id, "Comment added");

        // The comment is already stored; a failed notification only gets logged
        let event = CommentAdded {
            blog_id,
            author_email: author.email,
        };
        if let Err(e) = self.notifier.comment_added(event).await {
            tracing::warn!(blog_id, error = %e, "Failed to queue comment notification");
        }

        Ok(comment)
    }
}
