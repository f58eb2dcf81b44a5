//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::services::authz::TokenKeys;
use crate::stores::Stores;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// store handles opened at startup and the token keys.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    stores: Stores,
    tokens: TokenKeys,
    cors_origin: Option<String>,
}

impl AppState {
    /// Build state from loaded configuration and opened stores.
    #[must_use]
    pub fn new(config: &ApiConfig, stores: Stores) -> Self {
        Self::from_parts(
            stores,
            TokenKeys::new(&config.jwt_secret, config.jwt_ttl),
            config.cors_origin.clone(),
        )
    }

    /// Build state directly from its parts.
    #[must_use]
    pub fn from_parts(stores: Stores, tokens: TokenKeys, cors_origin: Option<String>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                stores,
                tokens,
                cors_origin,
            }),
        }
    }

    /// Get a reference to the store handles.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get a reference to the bearer token keys.
    #[must_use]
    pub fn tokens(&self) -> &TokenKeys {
        &self.inner.tokens
    }

    /// The allowed CORS origin, if restricted.
    #[must_use]
    pub fn cors_origin(&self) -> Option<&str> {
        self.inner.cors_origin.as_deref()
    }
}
