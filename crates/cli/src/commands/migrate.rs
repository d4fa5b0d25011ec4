//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! tiffin-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string for the site
//!   (falls back to `DATABASE_URL`)
//!
//! Applies the SQL migrations in `crates/site/migrations/`, then lets the
//! session store create its own table.

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the site database migrations.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrationError::MissingEnvVar("SITE_DATABASE_URL"))?;

    tracing::info!("Connecting to site database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running site migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Creating session store schema...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
