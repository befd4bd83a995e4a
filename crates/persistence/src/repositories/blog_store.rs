//! Blog repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::blog::{self, Entity as BlogEntity};
use crate::entities::comment::{self, Entity as CommentEntity};
use crate::entities::user::{self, Entity as UserEntity};
use blog_service_lib::BlogRepository;
use common::{AppResult, OptionExt, PaginationParams};
use domain::{Blog, BlogAuthor, BlogChanges, Comment, NewBlog, NewComment};

/// Concrete implementation of BlogRepository
pub struct BlogStore {
    db: DatabaseConnection,
}

impl BlogStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

type BlogRow = (blog::Model, Option<user::Model>);

/// The foreign key guarantees an author, so rows without one are skipped
fn with_author((blog, author): BlogRow) -> Option<(Blog, BlogAuthor)> {
    author.map(|author| (Blog::from(blog), BlogAuthor::from(author)))
}

#[async_trait]
impl BlogRepository for BlogStore {
    async fn create(&self, author_id: Uuid, new_blog: NewBlog) -> AppResult<Blog> {
        let now = Utc::now();
        let active_model = blog::ActiveModel {
            id: NotSet,
            author_id: Set(author_id),
            title: Set(new_blog.title),
            description: Set(new_blog.description),
            article: Set(new_blog.article),
            tags: Set(new_blog.tags),
            view_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Blog::from(model))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Blog>> {
        let result = BlogEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Blog::from))
    }

    async fn find_with_author(&self, id: i32) -> AppResult<Option<(Blog, BlogAuthor)>> {
        let result = BlogEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await?;

        Ok(result.and_then(with_author))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<Blog>, u64)> {
        let paginator = BlogEntity::find()
            .filter(blog::Column::AuthorId.eq(author_id))
            .order_by_desc(blog::Column::CreatedAt)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;

        Ok((rows.into_iter().map(Blog::from).collect(), total))
    }

    async fn list_with_authors(
        &self,
        page: PaginationParams,
    ) -> AppResult<(Vec<(Blog, BlogAuthor)>, u64)> {
        let paginator = BlogEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(blog::Column::CreatedAt)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;

        Ok((rows.into_iter().filter_map(with_author).collect(), total))
    }

    async fn increment_views(&self, id: i32) -> AppResult<bool> {
        let result = BlogEntity::update_many()
            .col_expr(
                blog::Column::ViewCount,
                Expr::col(blog::Column::ViewCount).add(1),
            )
            .filter(blog::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn update(&self, id: i32, changes: BlogChanges) -> AppResult<Blog> {
        let model = BlogEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Blog")?;

        let mut active: blog::ActiveModel = model.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(article) = changes.article {
            active.article = Set(article);
        }
        if let Some(tags) = changes.tags {
            active.tags = Set(tags);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Blog::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        // Comments go with the blog through ON DELETE CASCADE
        BlogEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn add_comment(&self, new_comment: NewComment) -> AppResult<Comment> {
        let active_model = comment::ActiveModel {
            id: NotSet,
            blog_id: Set(new_comment.blog_id),
            author_id: Set(new_comment.author_id),
            author_email: Set(new_comment.author_email),
            content: Set(new_comment.content),
            created_at: Set(Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Comment::from(model))
    }

    async fn comments_for(&self, blog_id: i32) -> AppResult<Vec<Comment>> {
        let models = CommentEntity::find()
            .filter(comment::Column::BlogId.eq(blog_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Comment::from).collect())
    }
}
