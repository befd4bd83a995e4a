//! Comment notifications through the email queue.

use std::sync::Arc;

use async_trait::async_trait;

use crate::job::EmailJob;
use crate::queue::EmailQueue;
use blog_service_lib::{CommentAdded, CommentNotifier};
use common::{AppResult, MailConfig};

/// `CommentNotifier` that enqueues an email to the blog's author.
///
/// The job is persisted before this returns, so delivery is at-least-once
/// from that point on.
pub struct QueueNotifier {
    queue: Arc<dyn EmailQueue>,
    from: String,
}

impl QueueNotifier {
    pub fn new(queue: Arc<dyn EmailQueue>, config: &MailConfig) -> Self {
        Self {
            queue,
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl CommentNotifier for QueueNotifier {
    async fn comment_added(&self, event: CommentAdded) -> AppResult<()> {
        let job = EmailJob::comment_added(self.from.clone(), event.author_email, event.blog_id);
        self.queue.enqueue(job).await?;

        tracing::debug!(blog_id = event.blog_id, "Comment notification queued");
        Ok(())
    }
}
