//! Authorization gate.
//!
//! Resolves a bearer token to an [`Identity`] and owns the single ownership
//! predicate, [`self_or_admin`], that every ownership-sensitive operation
//! goes through.
//!
//! Tokens are HS256 JWTs carrying `{id, email, role, iat, exp}`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopsphere_core::{Email, Role, UserId};

use crate::models::User;

/// Why a bearer credential was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// No `Authorization: Bearer` header.
    #[error("Access token required")]
    Missing,

    /// Signature is fine but `exp` has passed.
    #[error("Token expired")]
    Expired,

    /// Malformed, wrongly signed, or carrying unusable claims.
    #[error("Invalid token")]
    Invalid,
}

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub email: Email,
    pub role: Role,
}

impl Identity {
    /// Whether this requester may act on resources owned by `target`.
    #[must_use]
    pub const fn may_act_for(&self, target: UserId) -> bool {
        self_or_admin(self.id, self.role, target)
    }
}

/// A requester may act on a resource they own, and admins may act on any.
#[must_use]
pub const fn self_or_admin(requester: UserId, role: Role, target: UserId) -> bool {
    requester.as_i32() == target.as_i32() || role.is_admin()
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
    email: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Signing and verification keys plus the token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    /// Build keys from the shared HMAC secret.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// Issue a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token for `user` as if it were `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn issue_at(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            id: user.id.as_i32(),
            email: user.email.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: now.timestamp().saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verify a raw token.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Expired` for an expired token and
    /// `CredentialError::Invalid` for anything else that fails.
    pub fn verify(&self, token: &str) -> Result<Identity, CredentialError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            if e.kind() == &JwtErrorKind::ExpiredSignature {
                CredentialError::Expired
            } else {
                CredentialError::Invalid
            }
        })?;

        let email = Email::parse(&data.claims.email).map_err(|_| CredentialError::Invalid)?;
        Ok(Identity {
            id: UserId::new(data.claims.id),
            email,
            role: data.claims.role,
        })
    }

    /// Resolve an `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` if there is no bearer token, and
    /// whatever [`TokenKeys::verify`] returns otherwise.
    pub fn resolve(&self, authorization: Option<&str>) -> Result<Identity, CredentialError> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(CredentialError::Missing)?;
        self.verify(token)
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
