//! Mail Service Library
//!
//! Comment notification emails. The blog service hands `CommentAdded`
//! events to `QueueNotifier`, which persists an `EmailJob` in the
//! PostgreSQL-backed apalis queue; the worker consumes and delivers it.

pub mod job;
pub mod notifier;
pub mod queue;

pub use job::{email_job_handler, EmailJob};
pub use notifier::QueueNotifier;
pub use queue::{
    clear_failed_jobs, connect_storage, queue_status, run_worker, EmailQueue, QueueStatus,
};

#[cfg(any(test, feature = "test-utils"))]
pub use queue::MockEmailQueue;
