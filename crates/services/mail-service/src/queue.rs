//! PostgreSQL-backed email queue.
//!
//! Jobs live in apalis' `apalis.jobs` table, next to the application data.
//! The worker, the queue status report and the purge of failed jobs all
//! work against that table.

use apalis::prelude::*;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

use crate::job::{email_job_handler, EmailJob};
use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Email queue trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailQueue: Send + Sync {
    /// Persist a job for the worker to pick up
    async fn enqueue(&self, job: EmailJob) -> AppResult<()>;
}

#[async_trait]
impl EmailQueue for PostgresStorage<EmailJob> {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::queue(format!("Failed to enqueue email: {e}")))?;
        Ok(())
    }
}

/// Connect to the queue database and make sure the apalis tables exist.
pub async fn connect_storage(
    database_url: &str,
    max_connections: u32,
) -> AppResult<PostgresStorage<EmailJob>> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| AppError::queue(format!("Failed to connect to database: {e}")))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::queue(format!("Failed to setup job storage: {e}")))?;

    Ok(PostgresStorage::new(pool))
}

/// Consume email jobs until the monitor stops.
pub async fn run_worker(storage: PostgresStorage<EmailJob>) -> AppResult<()> {
    let worker = WorkerBuilder::new("email-worker")
        .backend(storage)
        .build_fn(email_job_handler);

    tracing::info!("Email worker started");

    Monitor::new()
        .register(worker)
        .run()
        .await
        .map_err(|e| AppError::queue(format!("Worker failed: {e}")))
}

/// Job counts per state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStatus {
    pub pending: i64,
    pub running: i64,
    pub failed: i64,
    pub done: i64,
}

impl QueueStatus {
    fn record(&mut self, status: &str, count: i64) {
        match status {
            "Pending" => self.pending = count,
            "Running" => self.running = count,
            "Failed" => self.failed = count,
            "Done" => self.done = count,
            _ => {}
        }
    }
}

async fn queue_initialized(db: &DatabaseConnection) -> AppResult<bool> {
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') as exists",
        ))
        .await?;

    Ok(row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false))
}

/// Job counts, or `None` if no worker has created the queue yet.
pub async fn queue_status(db: &DatabaseConnection) -> AppResult<Option<QueueStatus>> {
    if !queue_initialized(db).await? {
        return Ok(None);
    }

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT status::text as status, COUNT(*)::bigint as count FROM apalis.jobs GROUP BY status",
        ))
        .await?;

    let mut status = QueueStatus::default();
    for row in rows {
        if let (Ok(name), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            status.record(&name, count);
        }
    }

    Ok(Some(status))
}

/// Delete failed jobs, returning how many went, or `None` if there is no queue.
pub async fn clear_failed_jobs(db: &DatabaseConnection) -> AppResult<Option<u64>> {
    if !queue_initialized(db).await? {
        return Ok(None);
    }

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            "DELETE FROM apalis.jobs WHERE status = 'Failed'",
        ))
        .await?;

    Ok(Some(result.rows_affected()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ignores_unknown_states() {
        let mut status = QueueStatus::default();
        status.record("Pending", 3);
        status.record("Failed", 1);
        status.record("Killed", 9);

        assert_eq!(
            status,
            QueueStatus {
                pending: 3,
                running: 0,
                failed: 1,
                done: 0,
            }
        );
    }
}
