//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Users, blogs and comments are shared by every service crate; secret
//! hashing lives here so that passwords and refresh tokens go through the
//! same Argon2 configuration.

pub mod blog;
pub mod constants;
pub mod error;
pub mod password;
pub mod secret;
pub mod user;

pub use blog::{
    Blog, BlogAuthor, BlogChanges, BlogDetail, BlogListing, BlogSummary, Comment, CommentView,
    NewBlog, NewComment,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use secret::SecretHash;
pub use user::{NewUser, User, UserResponse};
