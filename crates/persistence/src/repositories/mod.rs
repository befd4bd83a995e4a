//! PostgreSQL repository implementations.

mod blog_store;
mod user_store;

pub use blog_store::BlogStore;
pub use user_store::UserStore;
