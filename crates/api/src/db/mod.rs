//! `PostgreSQL` access for the relational side of ShopSphere.
//!
//! # Tables
//!
//! - `users` - Accounts (Argon2id password hashes, `user_role` enum)
//! - `categories`, `products` - Catalog
//! - `orders`, `order_items` - Order history, read-only to the API
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shopsphere-cli -- migrate
//! ```
//!
//! Repositories here borrow the pool and return [`StoreError`]; the
//! [`crate::stores::postgres`] adapter wraps them behind the
//! `RelationalStore` trait.

pub mod catalog;
pub mod orders;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::stores::StoreError;

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `acquire_timeout` - How long to wait for a free connection
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(acquire_timeout)
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `StoreError::Conflict`.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict(format!("{what} already exists"));
    }
    StoreError::Relational(e)
}
