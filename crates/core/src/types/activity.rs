//! Activity log vocabulary.
//!
//! The activity log is append-only and keyed by these two closed enums, so the
//! document store never accumulates free-form action strings.

use serde::{Deserialize, Serialize};

/// Something a user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    ViewProduct,
    AddToCart,
    RemoveFromCart,
    AddToWishlist,
    RemoveFromWishlist,
    Search,
    CreateOrder,
    ViewOrder,
    Login,
    Logout,
    Register,
    UpdateProfile,
    AddReview,
    ViewCategory,
}

/// The kind of entity an activity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    Order,
    Review,
    Category,
    User,
    #[default]
    Other,
}
