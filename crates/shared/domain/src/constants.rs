//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "user";

/// Administrator role; satisfies every role check
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Validation
// =============================================================================

/// Maximum blog title length
pub const MAX_TITLE_LENGTH: usize = 300;

/// Maximum blog description length
pub const MAX_DESCRIPTION_LENGTH: usize = 600;

/// Maximum blog article length
pub const MAX_ARTICLE_LENGTH: usize = 3000;

/// Maximum number of tags on a blog
pub const MAX_TAGS: usize = 20;

/// Maximum comment length
pub const MAX_COMMENT_LENGTH: usize = 600;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 15;

/// Default refresh token lifetime in hours (7 days)
pub const DEFAULT_REFRESH_TOKEN_HOURS: i64 = 168;

/// Minimum token secret length (security requirement)
pub const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

// =============================================================================
// Notifications
// =============================================================================

/// Default sender address for transactional email
pub const DEFAULT_MAIL_FROM: &str = "support@blogapi.com";

/// Subject of the comment notification email
pub const COMMENT_ADDED_SUBJECT: &str = "Comment on your blog";
