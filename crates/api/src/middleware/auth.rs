//! Bearer authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::services::authz::Identity;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with a 401 envelope whose message tells a missing token apart from
/// an expired or invalid one.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(identity): RequireAuth) -> String {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let identity = state.tokens().resolve(header)?;

        set_sentry_user(&identity.id, Some(identity.email.as_str()));
        Ok(Self(identity))
    }
}
