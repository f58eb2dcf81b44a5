//! User management commands.
//!
//! The HTTP API only ever creates customers. Admin and seller accounts are
//! created here.

use shopsphere_api::models::NewUser;
use shopsphere_api::services::auth::hash_password;
use shopsphere_api::stores::postgres::PgRelationalStore;
use shopsphere_api::stores::{RelationalStore, StoreError};
use shopsphere_core::{Email, Role};

use super::{CliError, STORE_TIMEOUT, connect_postgres};

const MIN_PASSWORD_LENGTH: usize = 6;

/// Create a user with any role.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a bad email, role or password, and
/// a store error if the email is already registered.
pub async fn create(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
) -> Result<(), CliError> {
    let role: Role = role.parse().map_err(CliError::InvalidArgument)?;
    let email = Email::parse(email).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CliError::InvalidArgument(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let pool = connect_postgres().await?;
    let store = PgRelationalStore::new(pool, STORE_TIMEOUT);

    tracing::info!("Creating user: {} ({})", email, role);
    let user = store
        .create_user(NewUser {
            first_name: first_name.trim().to_owned(),
            last_name: last_name.trim().to_owned(),
            email: email.clone(),
            phone: None,
            password_hash: hash_password(password)?,
            role,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                CliError::InvalidArgument(format!("user already exists with email: {email}"))
            }
            other => other.into(),
        })?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.id,
        user.email,
        user.role
    );
    Ok(())
}
