//! Business logic services.
//!
//! # Services
//!
//! - `reviews` - review lifecycle, listings with stats
//! - `comments` - comments scoped to an existing review
//! - `search` - relevance-ranked review search
//! - `purchase` - verified-purchase checks against order history
//! - `aggregation` - rating distribution and mean for a product
//! - `authz` - bearer tokens, identities and the self-or-admin rule
//! - `auth` - registration, login and profile
//! - `catalog` - plain lookups
//! - `users` - profiles, account management and order history
//!
//! Services borrow the [`Stores`](crate::stores::Stores) bundle for the length
//! of a request and return [`ServiceError`], whose [`ErrorKind`] is the stable
//! machine-readable category the HTTP layer reports.

pub mod activity;
pub mod aggregation;
pub mod auth;
pub mod authz;
pub mod catalog;
pub mod comments;
pub mod purchase;
pub mod reviews;
pub mod search;
pub mod users;

use thiserror::Error;

use crate::stores::StoreError;
use authz::CredentialError;

/// Stable error categories shared by every service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    Unauthorized,
    Infrastructure,
}

impl ErrorKind {
    /// The wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the review, comment, search and lookup services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation.
    #[error("{0}")]
    Validation(String),

    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The write would break a uniqueness rule.
    #[error("{0}")]
    Conflict(String),

    /// The requester may not act on this entity.
    #[error("{0}")]
    Forbidden(String),

    /// The bearer credential is missing or unusable.
    #[error(transparent)]
    Unauthorized(#[from] CredentialError),

    /// A store was unreachable, timed out or returned unusable data.
    #[error("store error: {0}")]
    Infrastructure(#[from] StoreError),

    /// A new password could not be hashed.
    #[error("password hashing error")]
    PasswordHash,
}

impl ServiceError {
    /// The stable category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Infrastructure(_) | Self::PasswordHash => ErrorKind::Infrastructure,
        }
    }
}

/// Trim a required text field and check its length in characters.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max {
        return Err(ServiceError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(trimmed.to_owned())
}
