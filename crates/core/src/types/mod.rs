//! Core types for ShopSphere.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod activity;
pub mod document_id;
pub mod email;
pub mod id;
pub mod patch;
pub mod rating;
pub mod role;
pub mod status;

pub use activity::{ActivityAction, EntityType};
pub use document_id::{CommentId, ReviewId};
pub use email::{Email, EmailError};
pub use id::*;
pub use patch::Patch;
pub use rating::{Rating, RatingError};
pub use role::Role;
pub use status::OrderStatus;
