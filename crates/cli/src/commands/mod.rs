//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod user;

use std::time::Duration;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use shopsphere_api::services::auth::AuthError;
use shopsphere_api::stores::StoreError;
use shopsphere_api::stores::mongo::MongoStores;

/// Timeout for every store call made by the CLI.
const STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Relational database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Store adapter error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid command argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Account could not be created.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Seeding a review or comment failed.
    #[error("Seed error: {0}")]
    Seed(String),
}

/// Connect to the relational database named by `SHOPSPHERE_DATABASE_URL`
/// (or `DATABASE_URL`).
async fn connect_postgres() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("SHOPSPHERE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("SHOPSPHERE_DATABASE_URL"))?;

    tracing::info!("Connecting to PostgreSQL...");
    Ok(shopsphere_api::db::create_pool(&database_url, STORE_TIMEOUT).await?)
}

/// Connect to the document store named by `MONGODB_URI`/`MONGODB_DATABASE`.
async fn connect_mongo() -> Result<MongoStores, CliError> {
    dotenvy::dotenv().ok();
    let uri = SecretString::from(
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://127.0.0.1:27017".to_owned()),
    );
    let database =
        std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "shopsphere".to_owned());

    tracing::info!(%database, "Connecting to MongoDB...");
    Ok(MongoStores::connect(&uri, &database, STORE_TIMEOUT).await?)
}
