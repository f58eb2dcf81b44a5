//! Store seam: the traits the services depend on.
//!
//! ShopSphere keeps accounts, catalog and orders in `PostgreSQL` and reviews,
//! comments and the activity log in `MongoDB`. Services never see either
//! driver; they talk to the four traits below through a [`Stores`] bundle
//! that is built once at startup and injected through application state.
//!
//! # Implementations
//!
//! - [`postgres::PgRelationalStore`] - `sqlx` repositories from [`crate::db`]
//! - [`mongo::MongoStores`] - the `mongodb` driver
//! - [`memory::MemoryStores`] - `RwLock`-guarded maps for tests and local runs
//!
//! Production adapters bound every call with the configured store timeout, so
//! a hung store surfaces as [`StoreError::Timeout`] instead of a hung request.

pub mod memory;
pub mod mongo;
pub mod postgres;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use shopsphere_core::{CategoryId, CommentId, Email, OrderId, ProductId, ReviewId, UserId};

use crate::models::{
    Category, Comment, NewActivity, NewComment, NewReview, NewUser, Order, Page, Product,
    ProductSummary, RatingHistogram, Review, ReviewChanges, ReviewListQuery, SearchQuery, User,
    UserChanges, UserListQuery,
};

/// Errors raised by store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `PostgreSQL` operation failed.
    #[error("relational store error: {0}")]
    Relational(#[from] sqlx::Error),

    /// `MongoDB` operation failed.
    #[error("document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    /// A uniqueness constraint rejected the write.
    #[error("duplicate key: {0}")]
    Conflict(String),

    /// Stored data could not be mapped to a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store did not answer within the configured timeout.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

/// Run a store call with an upper bound on its duration.
///
/// # Errors
///
/// Returns `StoreError::Timeout` if `fut` does not finish within `limit`,
/// otherwise whatever `fut` returns.
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}

// =============================================================================
// Relational store
// =============================================================================

/// Accounts, catalog and order history.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Product id and name, if the product exists.
    async fn product_summary(&self, id: ProductId) -> Result<Option<ProductSummary>, StoreError>;

    /// Full product record with category name.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// All categories ordered by name.
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// A single category.
    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Whether `order` belongs to `user` and has an item for `product`.
    async fn order_contains_product(
        &self,
        user: UserId,
        order: OrderId,
        product: ProductId,
    ) -> Result<bool, StoreError>;

    /// A user by id.
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// A user and their password hash, looked up by email.
    async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, StoreError>;

    /// Insert a user. Fails with `StoreError::Conflict` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Users, newest first, optionally restricted to one role.
    async fn list_users(&self, query: &UserListQuery) -> Result<Page<User>, StoreError>;

    /// Apply profile changes and bump `updated_at`. Fails with
    /// `StoreError::Conflict` if the new email belongs to another user.
    async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, StoreError>;

    /// Delete a user together with their order history. Returns whether the
    /// user existed.
    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError>;

    /// Number of the user's orders that are still pending or processing.
    async fn open_order_count(&self, user: UserId) -> Result<u64, StoreError>;

    /// A user's orders with their items, newest first.
    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError>;
}

// =============================================================================
// Document store
// =============================================================================

/// Review collection.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Insert a review. Fails with `StoreError::Conflict` if the user already
    /// reviewed the product.
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError>;

    /// A review by id. Ids the store cannot parse are treated as absent.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, StoreError>;

    /// The review a user wrote for a product, if any.
    async fn find_by_product_and_user(
        &self,
        product: ProductId,
        user: UserId,
    ) -> Result<Option<Review>, StoreError>;

    /// Filtered, sorted, paginated reviews for a product.
    async fn list_for_product(&self, query: &ReviewListQuery) -> Result<Page<Review>, StoreError>;

    /// All reviews by a user, newest first.
    async fn list_for_user(&self, user: UserId) -> Result<Vec<Review>, StoreError>;

    /// Apply changes and bump `updatedAt`. Returns the updated review.
    async fn update(
        &self,
        id: &ReviewId,
        changes: &ReviewChanges,
    ) -> Result<Option<Review>, StoreError>;

    /// Hard-delete a review. Returns whether it existed.
    async fn delete(&self, id: &ReviewId) -> Result<bool, StoreError>;

    /// Atomically add one to the helpful counter.
    async fn increment_helpful(&self, id: &ReviewId) -> Result<Option<Review>, StoreError>;

    /// Review counts per star for a product, over all of its reviews.
    async fn rating_histogram(&self, product: ProductId) -> Result<RatingHistogram, StoreError>;

    /// Relevance-ranked text search over title and body.
    async fn search(&self, query: &SearchQuery) -> Result<Page<Review>, StoreError>;
}

/// Review comment collection.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Insert a comment.
    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError>;

    /// A comment by id. Ids the store cannot parse are treated as absent.
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, StoreError>;

    /// Comments under a review, oldest first.
    async fn list_for_review(&self, review: &ReviewId) -> Result<Vec<Comment>, StoreError>;

    /// Replace the comment text and bump `updatedAt`.
    async fn update_text(&self, id: &CommentId, text: &str)
    -> Result<Option<Comment>, StoreError>;

    /// Hard-delete a comment. Returns whether it existed.
    async fn delete(&self, id: &CommentId) -> Result<bool, StoreError>;
}

/// Append-only activity log.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Append an entry.
    async fn append(&self, entry: NewActivity) -> Result<(), StoreError>;
}

// =============================================================================
// Bundle
// =============================================================================

/// Every store handle the services need, opened once and shared.
#[derive(Clone)]
pub struct Stores {
    pub relational: Arc<dyn RelationalStore>,
    pub reviews: Arc<dyn ReviewStore>,
    pub comments: Arc<dyn CommentStore>,
    pub activity: Arc<dyn ActivityStore>,
}

impl Stores {
    /// Check both backing stores.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.relational.ping().await?;
        self.reviews.ping().await
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
