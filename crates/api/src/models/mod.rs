//! Domain models for the API.
//!
//! These are validated domain objects, separate from the row types used by
//! the relational repositories and the document types used by the MongoDB
//! adapter. Review-side types serialize in camelCase; account and catalog
//! types keep the snake_case column names clients already know.

pub mod activity;
pub mod catalog;
pub mod comment;
pub mod order;
pub mod page;
pub mod review;
pub mod user;

pub use activity::{ActivityEntry, ClientInfo, NewActivity};
pub use catalog::{Category, Product, ProductSummary};
pub use comment::{Comment, NewComment};
pub use order::{Order, OrderItem};
pub use page::{Page, Pagination};
pub use review::{
    NewReview, RatingHistogram, Review, ReviewChanges, ReviewFilter, ReviewListQuery, ReviewSort,
    SearchQuery,
};
pub use user::{NewUser, User, UserChanges, UserListQuery};
