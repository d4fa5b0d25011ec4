//! Admin access commands.
//!
//! # Usage
//!
//! ```bash
//! tiffin-cli admin grant -e admin@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string for the site
//!   (falls back to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use tiffin_core::{Email, EmailError};
use tiffin_site::db::{RepositoryError, UserRepository};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user registered with the email.
    #[error("No user registered with email: {0}")]
    UserNotFound(String),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Promote a registered user to admin.
///
/// The user must already have an account; this flips `is_admin` on the
/// existing row.
pub async fn grant(email: &str) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;

    let database_url = std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("SITE_DATABASE_URL"))?;

    tracing::info!("Connecting to site database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Granting admin access to {}", email);

    match UserRepository::new(&pool).grant_admin(&email).await {
        Ok(()) => {
            tracing::info!("{} is now an admin", email);
            // Sessions capture the role at login, so an already signed-in
            // user sees the admin area after their next login.
            tracing::info!("The user must log in again for the change to take effect");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(AdminError::UserNotFound(email.to_string())),
        Err(e) => Err(AdminError::Repository(e)),
    }
}
