//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};
use uuid::Uuid;

use crate::entities::user::{self, ActiveModel, Entity as UserEntity};
use auth_service_lib::UserRepository;
use common::{AppError, AppResult};
use domain::{NewUser, User};

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Single-row write of the refresh hash column
    async fn set_refresh_hash(&self, id: Uuid, hash: Option<String>) -> AppResult<bool> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::RefreshTokenHash, Expr::value(hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            refresh_token_hash: Set(None),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            roles: Set(new_user.roles),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(map_insert_error)?;
        Ok(User::from(model))
    }

    async fn update_refresh_hash(&self, id: Uuid, hash: String) -> AppResult<bool> {
        self.set_refresh_hash(id, Some(hash)).await
    }

    async fn clear_refresh_hash(&self, id: Uuid) -> AppResult<bool> {
        self.set_refresh_hash(id, None).await
    }
}
