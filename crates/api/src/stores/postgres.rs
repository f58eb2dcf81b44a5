//! `PostgreSQL` implementation of [`RelationalStore`].

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use shopsphere_core::{CategoryId, Email, OrderId, ProductId, UserId};

use super::{RelationalStore, StoreError, bounded};
use crate::db::catalog::CatalogRepository;
use crate::db::orders::OrderRepository;
use crate::db::users::UserRepository;
use crate::models::{
    Category, NewUser, Order, Page, Product, ProductSummary, User, UserChanges, UserListQuery,
};

/// Relational store backed by a `sqlx` pool.
#[derive(Debug, Clone)]
pub struct PgRelationalStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgRelationalStore {
    /// Wrap a pool; every call is bounded by `timeout`.
    #[must_use]
    pub const fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RelationalStore for PgRelationalStore {
    async fn ping(&self) -> Result<(), StoreError> {
        bounded(self.timeout, async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }

    async fn product_summary(&self, id: ProductId) -> Result<Option<ProductSummary>, StoreError> {
        bounded(
            self.timeout,
            CatalogRepository::new(&self.pool).product_summary(id),
        )
        .await
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        bounded(self.timeout, CatalogRepository::new(&self.pool).product(id)).await
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        bounded(self.timeout, CatalogRepository::new(&self.pool).categories()).await
    }

    async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        bounded(self.timeout, CatalogRepository::new(&self.pool).category(id)).await
    }

    async fn order_contains_product(
        &self,
        user: UserId,
        order: OrderId,
        product: ProductId,
    ) -> Result<bool, StoreError> {
        bounded(
            self.timeout,
            OrderRepository::new(&self.pool).contains_product(user, order, product),
        )
        .await
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        bounded(self.timeout, UserRepository::new(&self.pool).get_by_id(id)).await
    }

    async fn credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, StoreError> {
        bounded(
            self.timeout,
            UserRepository::new(&self.pool).get_with_password_hash(email),
        )
        .await
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        bounded(self.timeout, async {
            UserRepository::new(&self.pool).create(&user).await
        })
        .await
    }

    async fn list_users(&self, query: &UserListQuery) -> Result<Page<User>, StoreError> {
        bounded(self.timeout, UserRepository::new(&self.pool).list(query)).await
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, StoreError> {
        bounded(
            self.timeout,
            UserRepository::new(&self.pool).update(id, changes),
        )
        .await
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        bounded(self.timeout, UserRepository::new(&self.pool).delete(id)).await
    }

    async fn open_order_count(&self, user: UserId) -> Result<u64, StoreError> {
        bounded(
            self.timeout,
            OrderRepository::new(&self.pool).open_count(user),
        )
        .await
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        bounded(self.timeout, OrderRepository::new(&self.pool).for_user(user)).await
    }
}
