//! HTTP middleware and request extractors.

pub mod auth;
pub mod client;
pub mod request_id;

pub use auth::RequireAuth;
pub use client::Client;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
