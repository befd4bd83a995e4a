//! Blog and comment handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, Paginated, PaginationParams};
use domain::{Blog, BlogChanges, BlogDetail, BlogListing, BlogSummary, Comment, NewBlog};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// New blog post request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    #[schema(example = "Ownership in practice")]
    pub title: String,
    #[validate(length(min = 1, max = 600, message = "Description must be 1-600 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 3000, message = "Article must be 1-3000 characters"))]
    pub article: String,
    #[validate(length(max = 20, message = "At most 20 tags are allowed"))]
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreateBlogRequest> for NewBlog {
    fn from(request: CreateBlogRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            article: request.article,
            tags: request.tags,
        }
    }
}

/// Partial blog update; omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBlogRequest {
    #[validate(length(min = 1, max = 300, message = "Title must be 1-300 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 600, message = "Description must be 1-600 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 3000, message = "Article must be 1-3000 characters"))]
    pub article: Option<String>,
    #[validate(length(max = 20, message = "At most 20 tags are allowed"))]
    pub tags: Option<Vec<String>>,
}

impl From<UpdateBlogRequest> for BlogChanges {
    fn from(request: UpdateBlogRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            article: request.article,
            tags: request.tags,
        }
    }
}

/// Comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WriteCommentRequest {
    #[validate(length(min = 1, max = 600, message = "Comment must be 1-600 characters"))]
    #[schema(example = "Great read!")]
    pub content: String,
}

/// Create blog routes (all behind the access guard)
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_blog).get(list_my_blogs))
        .route("/all", get(list_all_blogs))
        .route(
            "/:id",
            get(get_my_blog).put(update_blog).delete(delete_blog),
        )
        .route("/:id/view", get(view_blog))
        .route("/:id/comment", post(write_comment))
}

/// Publish a blog post
#[utoipa::path(
    post,
    path = "/blogs",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = Blog),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_blog(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateBlogRequest>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    let blog = state
        .blog_service
        .create(current_user.id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(blog)))
}

/// List the caller's blogs
#[utoipa::path(
    get,
    path = "/blogs",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("pageSize" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "One page of the caller's blogs")
    )
)]
pub async fn list_my_blogs(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BlogSummary>>> {
    let blogs = state.blog_service.list_mine(current_user.id, page).await?;

    Ok(Json(blogs))
}

/// List everyone's blogs
#[utoipa::path(
    get,
    path = "/blogs/all",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("pageSize" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "One page of all blogs with author names")
    )
)]
pub async fn list_all_blogs(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BlogListing>>> {
    let blogs = state.blog_service.list_all(page).await?;

    Ok(Json(blogs))
}

/// Get one of the caller's blogs with its comments
#[utoipa::path(
    get,
    path = "/blogs/{id}",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog with comments", body = BlogDetail),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn get_my_blog(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BlogDetail>> {
    let blog = state.blog_service.find_one(current_user.id, id).await?;

    Ok(Json(blog))
}

/// Read any blog, counting the view
#[utoipa::path(
    get,
    path = "/blogs/{id}/view",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Blog with author", body = BlogListing),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn view_blog(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BlogListing>> {
    let blog = state.blog_service.view(id).await?;

    Ok(Json(blog))
}

/// Update one of the caller's blogs
#[utoipa::path(
    put,
    path = "/blogs/{id}",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blog ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Blog updated", body = Blog),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn update_blog(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateBlogRequest>,
) -> AppResult<Json<Blog>> {
    let blog = state
        .blog_service
        .update(current_user.id, id, payload.into())
        .await?;

    Ok(Json(blog))
}

/// Delete one of the caller's blogs
#[utoipa::path(
    delete,
    path = "/blogs/{id}",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Deleted blog", body = Blog),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn delete_blog(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Blog>> {
    let blog = state.blog_service.remove(current_user.id, id).await?;

    Ok(Json(blog))
}

/// Comment on a blog
#[utoipa::path(
    post,
    path = "/blogs/{id}/comment",
    tag = "Blogs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Blog ID")),
    request_body = WriteCommentRequest,
    responses(
        (status = 201, description = "Comment stored", body = Comment),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn write_comment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<WriteCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .blog_service
        .write_comment(current_user.id, current_user.email, id, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}
