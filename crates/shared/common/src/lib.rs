//! Common utilities shared across the service crates.
//!
//! This crate provides:
//! - Unified error handling with HTTP mapping
//! - Configuration structures loaded from the environment
//! - Pagination types for list endpoints

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
