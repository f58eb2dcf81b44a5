//! Client address and user agent extractor for the activity log.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, header::USER_AGENT, request::Parts},
};

use crate::models::ClientInfo;

/// Extracts [`ClientInfo`] from proxy headers or the peer address. Never fails.
#[derive(Debug, Clone, Default)]
pub struct Client(pub ClientInfo);

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // First hop of X-Forwarded-For is the original client
        let forwarded = header(&parts.headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()));
        let ip_address = forwarded
            .or_else(|| header(&parts.headers, "x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        Ok(Self(ClientInfo {
            ip_address,
            user_agent: header(&parts.headers, USER_AGENT.as_str()),
        }))
    }
}
