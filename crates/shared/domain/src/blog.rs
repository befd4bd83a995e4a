//! Blog and comment entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    MAX_ARTICLE_LENGTH, MAX_COMMENT_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_TAGS, MAX_TITLE_LENGTH,
};
use crate::error::{DomainError, DomainResult};

/// Blog post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i32,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    pub article: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public identity of a blog's author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlogAuthor {
    #[serde(skip_serializing)]
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Blog as listed for its own author (no article body)
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Blog> for BlogSummary {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
            tags: blog.tags,
            view_count: blog.view_count,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

/// Blog as listed publicly, with the author's name
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlogListing {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub author: BlogAuthor,
}

impl BlogListing {
    /// Listing without the article body
    pub fn summary(blog: Blog, author: BlogAuthor) -> Self {
        Self {
            article: None,
            ..Self::full(blog, author)
        }
    }

    /// Listing including the article body
    pub fn full(blog: Blog, author: BlogAuthor) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            description: blog.description,
            article: Some(blog.article),
            tags: blog.tags,
            view_count: blog.view_count,
            created_at: blog.created_at,
            author,
        }
    }
}

/// Blog with its comments, as seen by its author
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    pub comments: Vec<CommentView>,
}

/// Comment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i32,
    pub blog_id: i32,
    pub author_id: Uuid,
    pub author_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment as shown under a blog
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub author_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author_email: comment.author_email,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// Fields of a new blog post
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub article: String,
    pub tags: Vec<String>,
}

impl NewBlog {
    pub fn validate(&self) -> DomainResult<()> {
        check_text("title", &self.title, MAX_TITLE_LENGTH)?;
        check_text("description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        check_text("article", &self.article, MAX_ARTICLE_LENGTH)?;
        check_tags(&self.tags)
    }
}

/// Partial update of a blog post; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub article: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl BlogChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            check_text("title", title, MAX_TITLE_LENGTH)?;
        }
        if let Some(description) = &self.description {
            check_text("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        if let Some(article) = &self.article {
            check_text("article", article, MAX_ARTICLE_LENGTH)?;
        }
        if let Some(tags) = &self.tags {
            check_tags(tags)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.article.is_none()
            && self.tags.is_none()
    }
}

/// A comment about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub blog_id: i32,
    pub author_id: Uuid,
    pub author_email: String,
    pub content: String,
}

impl NewComment {
    pub fn new(
        blog_id: i32,
        author_id: Uuid,
        author_email: impl Into<String>,
        content: impl Into<String>,
    ) -> DomainResult<Self> {
        let content = content.into();
        check_text("content", &content, MAX_COMMENT_LENGTH)?;
        Ok(Self {
            blog_id,
            author_id,
            author_email: author_email.into(),
            content,
        })
    }
}

fn check_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn check_tags(tags: &[String]) -> DomainResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(DomainError::validation(format!(
            "tags must contain at most {MAX_TAGS} entries"
        )));
    }
    Ok(())
}
