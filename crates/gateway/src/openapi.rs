//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{SignInRequest, SignUpRequest, TokenPairResponse};
use crate::handlers::blog_handler::{CreateBlogRequest, UpdateBlogRequest, WriteCommentRequest};
use domain::{
    Blog, BlogAuthor, BlogDetail, BlogListing, BlogSummary, Comment, CommentView, UserResponse,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::sign_up,
        crate::handlers::auth_handler::sign_in,
        crate::handlers::auth_handler::refresh_tokens,
        crate::handlers::auth_handler::sign_out,
        crate::handlers::auth_handler::me,
        crate::handlers::blog_handler::create_blog,
        crate::handlers::blog_handler::list_my_blogs,
        crate::handlers::blog_handler::list_all_blogs,
        crate::handlers::blog_handler::get_my_blog,
        crate::handlers::blog_handler::view_blog,
        crate::handlers::blog_handler::update_blog,
        crate::handlers::blog_handler::delete_blog,
        crate::handlers::blog_handler::write_comment,
    ),
    components(
        schemas(
            SignUpRequest,
            SignInRequest,
            TokenPairResponse,
            UserResponse,
            CreateBlogRequest,
            UpdateBlogRequest,
            WriteCommentRequest,
            Blog,
            BlogAuthor,
            BlogSummary,
            BlogListing,
            BlogDetail,
            Comment,
            CommentView,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in and token rotation"),
        (name = "Blogs", description = "Blog posts and comments"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
