//! Email background job.
//!
//! No transport is wired in: the handler records each email through
//! `tracing`, which is what delivery amounts to in development.

use serde::{Deserialize, Serialize};

use common::AppError;
use domain::COMMENT_ADDED_SUBJECT;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Sender address
    pub from: String,
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Plain text body
    pub body: String,
}

impl EmailJob {
    /// Create a new email job
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Tell a blog's author that someone commented
    pub fn comment_added(from: impl Into<String>, to: impl Into<String>, blog_id: i32) -> Self {
        Self::new(
            from,
            to,
            COMMENT_ADDED_SUBJECT,
            format!("A comment added to blog with id: {blog_id}."),
        )
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    if job.to.trim().is_empty() {
        return Err(AppError::validation("Email job has no recipient"));
    }

    tracing::info!(
        to = %job.to,
        from = %job.from,
        subject = %job.subject,
        "Processing email job"
    );
    tracing::info!(
        "=== EMAIL ===\n\
         From: {}\n\
         To: {}\n\
         Subject: {}\n\
         Body:\n{}\n\
         =============",
        job.from,
        job.to,
        job.subject,
        job.body
    );

    Ok(())
}
