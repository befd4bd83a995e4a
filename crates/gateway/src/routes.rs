//! Route configuration.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_routes, blog_routes, health_routes, refresh_routes, session_routes};
use crate::middleware::{auth_middleware, refresh_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let auth = auth_routes()
        .merge(
            session_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .merge(
            refresh_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), refresh_middleware)),
        );

    Router::new()
        // Liveness and health (no auth)
        .merge(health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/auth", auth)
        // Blog routes (access token required)
        .nest(
            "/blogs",
            blog_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
