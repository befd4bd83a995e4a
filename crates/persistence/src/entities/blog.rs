//! Blog database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Blog, BlogAuthor};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub article: String,
    pub tags: Vec<String>,
    pub view_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Blog {
    fn from(model: Model) -> Self {
        Blog {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            description: model.description,
            article: model.article,
            tags: model.tags,
            view_count: model.view_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<super::user::Model> for BlogAuthor {
    fn from(user: super::user::Model) -> Self {
        BlogAuthor {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}
