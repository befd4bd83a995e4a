//! Persistence Library
//!
//! SeaORM entities, migrations and the PostgreSQL implementations of the
//! service repositories.

pub mod db;
pub mod entities;
pub mod migrations;
pub mod repositories;

pub use db::{Database, MigrateAction};
pub use migrations::Migrator;
pub use repositories::{BlogStore, UserStore};
