//! Authentication error types.

use thiserror::Error;

use crate::services::ErrorKind;
use crate::stores::StoreError;

/// Errors that can occur during registration, login and profile lookup.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field is missing.
    #[error("{0}")]
    MissingFields(String),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopsphere_core::EmailError),

    /// Password too short.
    #[error("{0}")]
    WeakPassword(String),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The bearer's account no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Token could not be signed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// The stable category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields(_) | Self::InvalidEmail(_) | Self::WeakPassword(_) => {
                ErrorKind::Validation
            }
            Self::InvalidCredentials => ErrorKind::Unauthorized,
            Self::UserNotFound => ErrorKind::NotFound,
            Self::UserAlreadyExists => ErrorKind::Conflict,
            Self::Store(_) | Self::Token(_) | Self::PasswordHash => ErrorKind::Infrastructure,
        }
    }

    /// The message shown to clients. Server-side details are never included.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingFields(msg) | Self::WeakPassword(msg) => msg.clone(),
            Self::InvalidEmail(_) => "Invalid email format".to_owned(),
            Self::InvalidCredentials => "Invalid email or password".to_owned(),
            Self::UserNotFound => "User not found".to_owned(),
            Self::UserAlreadyExists => "Email already registered".to_owned(),
            Self::Store(_) | Self::Token(_) | Self::PasswordHash => {
                "Internal server error".to_owned()
            }
        }
    }
}
