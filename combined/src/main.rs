//! Blog API binary - HTTP server, email worker and maintenance commands.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service_lib::{CredentialVerifier, JwtSigner, TokenManager};
use blog_service_lib::BlogManager;
use common::{AppError, AppResult, AuthConfig, DatabaseConfig, MailConfig, ServerConfig};
use gateway_lib::AppState;
use mail_service_lib::{clear_failed_jobs, connect_storage, queue_status, run_worker, QueueNotifier};
use persistence::{BlogStore, Database, UserStore};

#[derive(Parser)]
#[command(name = "blog-api")]
#[command(about = "Blogging backend: REST API, email worker and database tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API together with the email worker
    Serve {
        /// Overrides SERVER_HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides SERVER_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Inspect or process the email queue
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateAction> for persistence::MigrateAction {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => persistence::MigrateAction::Up,
            MigrateAction::Down => persistence::MigrateAction::Down,
            MigrateAction::Status => persistence::MigrateAction::Status,
            MigrateAction::Fresh => persistence::MigrateAction::Fresh,
        }
    }
}

#[derive(Subcommand, Clone, Copy)]
enum JobsAction {
    /// Run only the email worker
    Work,
    /// Show job counts per state
    List,
    /// Delete failed jobs
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => serve(host, port).await?,
        Commands::Migrate { action } => {
            let config = DatabaseConfig::from_env()?;
            let database = Database::connect_without_migrations(&config).await?;
            database.migrate(action.into()).await?;
        }
        Commands::Jobs { action } => jobs(action).await?,
    }

    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>) -> AppResult<()> {
    let mut server = ServerConfig::from_env()?;
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }
    let addr: SocketAddr = server
        .addr()
        .parse()
        .map_err(|e| AppError::config(format!("Invalid listen address {}: {e}", server.addr())))?;

    let db_config = DatabaseConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;
    let mail_config = MailConfig::from_env();

    let database = Database::connect(&db_config).await?;
    let storage = connect_storage(&db_config.url, db_config.max_connections).await?;

    let users = Arc::new(UserStore::new(database.get_connection()));
    let auth_service = TokenManager::new(
        users.clone(),
        CredentialVerifier::new(users),
        Arc::new(JwtSigner::new()),
        auth_config,
    );

    let notifier = QueueNotifier::new(Arc::new(storage.clone()), &mail_config);
    let blog_service = BlogManager::new(
        Arc::new(BlogStore::new(database.get_connection())),
        Arc::new(notifier),
    );

    let state = AppState::new(
        Arc::new(auth_service),
        Arc::new(blog_service),
        Arc::new(database),
    );

    info!("Starting blog API on http://{}", addr);

    tokio::select! {
        result = gateway_lib::serve(addr, state, shutdown_signal()) => {
            info!("HTTP server stopped");
            result
        }
        result = run_worker(storage) => {
            error!("Email worker exited unexpectedly");
            result
        }
    }
}

async fn jobs(action: JobsAction) -> AppResult<()> {
    let db_config = DatabaseConfig::from_env()?;

    match action {
        JobsAction::Work => {
            let storage = connect_storage(&db_config.url, db_config.max_connections).await?;
            run_worker(storage).await?;
        }
        JobsAction::List => {
            let database = Database::connect_without_migrations(&db_config).await?;
            match queue_status(database.connection()).await? {
                Some(status) => {
                    println!("pending: {}", status.pending);
                    println!("running: {}", status.running);
                    println!("failed:  {}", status.failed);
                    println!("done:    {}", status.done);
                }
                None => println!("Email queue has not been created yet"),
            }
        }
        JobsAction::Clear => {
            let database = Database::connect_without_migrations(&db_config).await?;
            match clear_failed_jobs(database.connection()).await? {
                Some(removed) => println!("Removed {} failed job(s)", removed),
                None => println!("Email queue has not been created yet"),
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
