//! In-memory store implementations.
//!
//! Thread-safe maps behind `tokio::sync::RwLock`, used by the service and
//! router tests and by local runs without databases. Each store is cheap to
//! clone; clones share the same data.
//!
//! Writes that must be atomic in production (the one-review-per-product rule,
//! helpful votes) happen under a single write lock here.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use shopsphere_core::{
    CategoryId, CommentId, Email, OrderId, OrderStatus, ProductId, ReviewId, UserId,
};

use super::{ActivityStore, CommentStore, RelationalStore, ReviewStore, StoreError, Stores};
use crate::models::{
    ActivityEntry, Category, Comment, NewActivity, NewComment, NewReview, NewUser, Order,
    OrderItem, Page, Product, ProductSummary, RatingHistogram, Review, ReviewChanges,
    ReviewListQuery, SearchQuery, User, UserChanges, UserListQuery,
};

fn next_document_id() -> String {
    ObjectId::new().to_hex()
}

// =============================================================================
// Relational
// =============================================================================

#[derive(Debug)]
struct StoredOrder {
    user: UserId,
    status: OrderStatus,
    products: Vec<ProductId>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct RelationalData {
    users: BTreeMap<UserId, (User, String)>,
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, StoredOrder>,
}

/// Accounts, catalog and orders held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRelationalStore {
    data: Arc<RwLock<RelationalData>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryRelationalStore {
    /// Make every subsequent call fail with a timeout.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::ZERO));
        }
        Ok(())
    }

    /// Add a user with an already-hashed password.
    pub async fn insert_user(&self, user: User, password_hash: impl Into<String>) {
        self.data
            .write()
            .await
            .users
            .insert(user.id, (user, password_hash.into()));
    }

    /// Add a category. Its product count is derived from the products added.
    pub async fn insert_category(&self, id: CategoryId, name: &str, description: Option<&str>) {
        self.data.write().await.categories.insert(
            id,
            Category {
                id,
                name: name.to_owned(),
                description: description.map(str::to_owned),
                product_count: 0,
            },
        );
    }

    /// Add a product.
    pub async fn insert_product(&self, product: Product) {
        self.data.write().await.products.insert(product.id, product);
    }

    /// Record a delivered order placed by `user` containing one of each of
    /// `products`.
    pub async fn insert_order(&self, order: OrderId, user: UserId, products: &[ProductId]) {
        self.data.write().await.orders.insert(
            order,
            StoredOrder {
                user,
                status: OrderStatus::Delivered,
                products: products.to_vec(),
                created_at: Utc::now(),
            },
        );
    }

    /// Move an existing order to `status`.
    pub async fn set_order_status(&self, order: OrderId, status: OrderStatus) {
        if let Some(stored) = self.data.write().await.orders.get_mut(&order) {
            stored.status = status;
        }
    }
}

fn order_view(data: &RelationalData, id: OrderId, stored: &StoredOrder) -> Order {
    let items: Vec<OrderItem> = stored
        .products
        .iter()
        .map(|product_id| {
            let product = data.products.get(product_id);
            OrderItem {
                product_id: *product_id,
                product_name: product.map(|p| p.name.clone()).unwrap_or_default(),
                product_image: product.and_then(|p| p.image_url.clone()),
                quantity: 1,
                unit_price: product.map_or(Decimal::ZERO, |p| p.price),
            }
        })
        .collect();
    let count = i64::try_from(items.len()).unwrap_or(i64::MAX);

    Order {
        id,
        status: stored.status,
        total_amount: items.iter().map(|i| i.unit_price).sum(),
        created_at: stored.created_at,
        items_count: count,
        total_items: count,
        items,
    }
}

fn with_product_count(data: &RelationalData, category: &Category) -> Category {
    let count = data
        .products
        .values()
        .filter(|p| p.category_id == category.id && p.is_active)
        .count();
    Category {
        product_count: i64::try_from(count).unwrap_or(i64::MAX),
        ..category.clone()
    }
}

#[async_trait]
impl RelationalStore for MemoryRelationalStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn product_summary(&self, id: ProductId) -> Result<Option<ProductSummary>, StoreError> {
        self.check_available()?;
        Ok(self.data.read().await.products.get(&id).map(Product::summary))
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.check_available()?;
        Ok(self.data.read().await.products.get(&id).cloned())
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        self.check_available()?;
        let data = self.data.read().await;
        let mut categories: Vec<Category> = data
            .categories
            .values()
            .map(|c| with_product_count(&data, c))
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        self.check_available()?;
        let data = self.data.read().await;
        Ok(data
            .categories
            .get(&id)
            .map(|c| with_product_count(&data, c)))
    }

    async fn order_contains_product(
        &self,
        user: UserId,
        order: OrderId,
        product: ProductId,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .await
            .orders
            .get(&order)
            .is_some_and(|o| o.user == user && o.products.contains(&product)))
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .await
            .users
            .get(&id)
            .map(|(user, _)| user.clone()))
    }

    async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, StoreError> {
        self.check_available()?;
        Ok(self
            .data
            .read()
            .await
            .users
            .values()
            .find(|(user, _)| &user.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.check_available()?;
        let mut data = self.data.write().await;
        if data.users.values().any(|(u, _)| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {}", user.email)));
        }

        let id = data
            .users
            .keys()
            .next_back()
            .map_or(1, |last| last.as_i32() + 1);
        let now = Utc::now();
        let created = User {
            id: UserId::new(id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        data.users
            .insert(created.id, (created.clone(), user.password_hash));
        Ok(created)
    }

    async fn list_users(&self, query: &UserListQuery) -> Result<Page<User>, StoreError> {
        self.check_available()?;
        let data = self.data.read().await;
        let mut users: Vec<User> = data
            .users
            .values()
            .map(|(user, _)| user)
            .filter(|user| query.role.is_none_or(|role| user.role == role))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = u64::try_from(users.len()).unwrap_or(u64::MAX);
        Ok(Page {
            items: query.page.slice(users),
            total,
        })
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        let mut data = self.data.write().await;
        if let Some(email) = &changes.email
            && data
                .users
                .values()
                .any(|(u, _)| u.id != id && &u.email == email)
        {
            return Err(StoreError::Conflict(format!("email {email}")));
        }

        let Some((user, password_hash)) = data.users.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(user);
        if let Some(hash) = &changes.password_hash {
            password_hash.clone_from(hash);
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut data = self.data.write().await;
        if data.users.remove(&id).is_none() {
            return Ok(false);
        }
        data.orders.retain(|_, order| order.user != id);
        Ok(true)
    }

    async fn open_order_count(&self, user: UserId) -> Result<u64, StoreError> {
        self.check_available()?;
        let count = self
            .data
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.user == user && o.status.is_open())
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        self.check_available()?;
        let data = self.data.read().await;
        let mut orders: Vec<Order> = data
            .orders
            .iter()
            .filter(|(_, stored)| stored.user == user)
            .map(|(&id, stored)| order_view(&data, id, stored))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }
}

// =============================================================================
// Reviews
// =============================================================================

/// Reviews held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryReviewStore {
    reviews: Arc<RwLock<HashMap<ReviewId, Review>>>,
}

/// Lowercased alphanumeric words.
fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Number of query-term occurrences in a review's title and body.
fn relevance(query_terms: &[String], review: &Review) -> usize {
    terms(&review.title)
        .into_iter()
        .chain(terms(&review.comment))
        .filter(|t| query_terms.contains(t))
        .count()
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.write().await;
        if reviews
            .values()
            .any(|r| r.product_id == review.product_id && r.user_id == review.user_id)
        {
            return Err(StoreError::Conflict(
                "review for this product and user".to_owned(),
            ));
        }

        let stored = Review {
            id: ReviewId::new(next_document_id()),
            product_id: review.product_id,
            user_id: review.user_id,
            order_id: review.order_id,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            pros: review.pros,
            cons: review.cons,
            verified_purchase: review.verified_purchase,
            helpful: 0,
            created_at: review.created_at,
            updated_at: review.created_at,
        };
        reviews.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, StoreError> {
        Ok(self.reviews.read().await.get(id).cloned())
    }

    async fn find_by_product_and_user(
        &self,
        product: ProductId,
        user: UserId,
    ) -> Result<Option<Review>, StoreError> {
        Ok(self
            .reviews
            .read()
            .await
            .values()
            .find(|r| r.product_id == product && r.user_id == user)
            .cloned())
    }

    async fn list_for_product(&self, query: &ReviewListQuery) -> Result<Page<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<&Review> = reviews
            .values()
            .filter(|r| query.filter.matches(r))
            .collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        Ok(Page {
            total: matching.len() as u64,
            items: query.page.slice(matching.into_iter().cloned()),
        })
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        let mut mine: Vec<Review> = reviews
            .values()
            .filter(|r| r.user_id == user)
            .cloned()
            .collect();
        mine.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(mine)
    }

    async fn update(
        &self,
        id: &ReviewId,
        changes: &ReviewChanges,
    ) -> Result<Option<Review>, StoreError> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.get_mut(id).map(|review| {
            changes.apply_to(review, Utc::now());
            review.clone()
        }))
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, StoreError> {
        Ok(self.reviews.write().await.remove(id).is_some())
    }

    async fn increment_helpful(&self, id: &ReviewId) -> Result<Option<Review>, StoreError> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.get_mut(id).map(|review| {
            review.helpful += 1;
            review.clone()
        }))
    }

    async fn rating_histogram(&self, product: ProductId) -> Result<RatingHistogram, StoreError> {
        Ok(self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.product_id == product)
            .map(|r| r.rating)
            .collect())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Page<Review>, StoreError> {
        let query_terms = terms(&query.text);
        let reviews = self.reviews.read().await;
        let mut scored: Vec<(usize, &Review)> = reviews
            .values()
            .filter(|r| query.product_id.is_none_or(|p| r.product_id == p))
            .map(|r| (relevance(&query_terms, r), r))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|(sa, a), (sb, b)| {
            sb.cmp(sa)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(Page {
            total: scored.len() as u64,
            items: query
                .page
                .slice(scored.into_iter().map(|(_, r)| r.clone())),
        })
    }
}

// =============================================================================
// Comments
// =============================================================================

/// Review comments held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCommentStore {
    comments: Arc<RwLock<HashMap<CommentId, Comment>>>,
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let now = Utc::now();
        let stored = Comment {
            id: CommentId::new(next_document_id()),
            review_id: comment.review_id,
            user_id: comment.user_id,
            comment: comment.comment,
            created_at: now,
            updated_at: now,
        };
        self.comments
            .write()
            .await
            .insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, StoreError> {
        Ok(self.comments.read().await.get(id).cloned())
    }

    async fn list_for_review(&self, review: &ReviewId) -> Result<Vec<Comment>, StoreError> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| &c.review_id == review)
            .cloned()
            .collect();
        // ObjectId hex grows with insertion order, so it breaks same-instant ties.
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    async fn update_text(
        &self,
        id: &CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let mut comments = self.comments.write().await;
        Ok(comments.get_mut(id).map(|comment| {
            text.clone_into(&mut comment.comment);
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, StoreError> {
        Ok(self.comments.write().await.remove(id).is_some())
    }
}

// =============================================================================
// Activity
// =============================================================================

/// Activity log held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryActivityStore {
    entries: Arc<RwLock<Vec<ActivityEntry>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryActivityStore {
    /// Everything appended so far, oldest first.
    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.read().await.clone()
    }

    /// Make every subsequent append fail with a timeout.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn append(&self, entry: NewActivity) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Timeout(Duration::ZERO));
        }

        self.entries.write().await.push(ActivityEntry {
            id: next_document_id(),
            user_id: entry.user_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            metadata: entry.metadata,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            created_at: Utc::now(),
        });
        Ok(())
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// One of each in-memory store, with typed access for seeding and inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStores {
    pub relational: MemoryRelationalStore,
    pub reviews: MemoryReviewStore,
    pub comments: MemoryCommentStore,
    pub activity: MemoryActivityStore,
}

impl MemoryStores {
    /// Create an empty set of stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trait-object handles sharing this bundle's data.
    #[must_use]
    pub fn stores(&self) -> Stores {
        Stores {
            relational: Arc::new(self.relational.clone()),
            reviews: Arc::new(self.reviews.clone()),
            comments: Arc::new(self.comments.clone()),
            activity: Arc::new(self.activity.clone()),
        }
    }
}
