//! ShopSphere API library.
//!
//! The review backend as a library, so the router can be driven in tests
//! against in-memory stores and the CLI can reuse the store adapters.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;

#[cfg(test)]
mod testing;
