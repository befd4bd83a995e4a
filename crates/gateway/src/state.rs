//! Application state for dependency injection.

use std::sync::Arc;

use async_trait::async_trait;

use auth_service_lib::AuthService;
use blog_service_lib::BlogService;
use common::AppResult;
use persistence::Database;

/// Connectivity probe behind `/health`.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}

#[async_trait]
impl HealthCheck for Database {
    async fn ping(&self) -> AppResult<()> {
        Ok(Database::ping(self).await?)
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub blog_service: Arc<dyn BlogService>,
    pub database: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        blog_service: Arc<dyn BlogService>,
        database: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            auth_service,
            blog_service,
            database,
        }
    }
}
