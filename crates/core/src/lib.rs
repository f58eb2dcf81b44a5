//! ShopSphere Core - Shared domain types.
//!
//! This crate provides the types shared by every ShopSphere component:
//! - `api` - The REST backend (relational + document stores)
//! - `cli` - Command-line tools for migrations, indexes, and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Store adapters live in the `api` crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, ratings, emails, roles, order status, activity
//!   enums, and the [`Patch`] wrapper for partial updates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
