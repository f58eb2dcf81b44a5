//! Authentication service.
//!
//! Password registration and login, issuing bearer tokens from
//! [`TokenKeys`]. Self-registration always creates a customer; elevated roles
//! are only granted through the CLI.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopsphere_core::{ActivityAction, Email, EntityType, Role};

use super::activity;
use super::authz::{Identity, TokenKeys};
use crate::models::{ClientInfo, NewActivity, NewUser, User};
use crate::stores::{StoreError, Stores};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Body of a registration request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

/// Body of a login request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A signed-in user and their bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    stores: &'a Stores,
    tokens: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(stores: &'a Stores, tokens: &'a TokenKeys) -> Self {
        Self { stores, tokens }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new customer account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if a name, the email or the
    /// password is missing, `AuthError::InvalidEmail` or
    /// `AuthError::WeakPassword` for bad values, and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        input: RegisterInput,
        client: &ClientInfo,
    ) -> Result<AuthSession, AuthError> {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
            non_blank(input.first_name),
            non_blank(input.last_name),
            non_blank(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingFields(
                "Missing required fields: first_name, last_name, email, password".to_owned(),
            ));
        };

        let email = Email::parse(&email)?;
        validate_password(&password)?;
        let password_hash = hash_password(&password)?;

        let user = self
            .stores
            .relational
            .create_user(NewUser {
                first_name,
                last_name,
                email,
                phone: non_blank(input.phone),
                password_hash,
                role: Role::Customer,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Store(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        self.record(&user, ActivityAction::Register, client).await;
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if either is missing and
    /// `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        input: LoginInput,
        client: &ClientInfo,
    ) -> Result<AuthSession, AuthError> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(AuthError::MissingFields(
                "Email and password required".to_owned(),
            ));
        };

        // Unparseable emails cannot belong to an account
        let email = Email::parse(&email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .stores
            .relational
            .credentials_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(&password, &password_hash)?;

        tracing::info!(user_id = %user.id, "User logged in");
        self.record(&user, ActivityAction::Login, client).await;
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// The profile behind a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account was removed after the
    /// token was issued.
    pub async fn me(&self, identity: &Identity) -> Result<User, AuthError> {
        self.stores
            .relational
            .user_by_id(identity.id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn record(&self, user: &User, action: ActivityAction, client: &ClientInfo) {
        activity::record(
            self.stores.activity.as_ref(),
            NewActivity::new(Some(user.id), action)
                .entity(EntityType::User, user.id)
                .client(client),
        )
        .await;
    }
}

pub(crate) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
