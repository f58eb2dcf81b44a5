//! Order repository.
//!
//! The API never writes orders. It asks whether an order proves a purchase,
//! shows a user their order history and counts open orders before an
//! account is deleted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use shopsphere_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::models::{Order, OrderItem};
use crate::stores::StoreError;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    status: OrderStatus,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    items_count: i64,
    total_items: i64,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    product_image: Option<String>,
    quantity: i32,
    unit_price: Decimal,
}

/// Repository for order lookups.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether `order` is owned by `user` and contains `product`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn contains_product(
        &self,
        user: UserId,
        order: OrderId,
        product: ProductId,
    ) -> Result<bool, StoreError> {
        let found = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1
                FROM order_items oi
                JOIN orders o ON o.id = oi.order_id
                WHERE o.id = $1 AND o.user_id = $2 AND oi.product_id = $3
            )
            ",
        )
        .bind(order)
        .bind(user)
        .bind(product)
        .fetch_one(self.pool)
        .await?;

        Ok(found)
    }

    /// Orders by `user` that are pending or processing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn open_count(&self, user: UserId) -> Result<u64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM orders
            WHERE user_id = $1 AND status IN ('pending', 'processing')
            ",
        )
        .bind(user)
        .fetch_one(self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// A user's orders, newest first, each with its items.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if a query fails.
    pub async fn for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        let orders = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT o.id, o.status, o.total_amount, o.created_at,
                   COUNT(oi.id) AS items_count,
                   COALESCE(SUM(oi.quantity), 0) AS total_items
            FROM orders o
            LEFT JOIN order_items oi ON oi.order_id = o.id
            WHERE o.user_id = $1
            GROUP BY o.id
            ORDER BY o.created_at DESC, o.id DESC
            ",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.order_id, oi.product_id, p.name AS product_name,
                   p.image_url AS product_image, oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.user_id = $1
            ORDER BY oi.id
            ",
        )
        .bind(user)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in items {
            by_order.entry(row.order_id).or_default().push(OrderItem {
                product_id: row.product_id,
                product_name: row.product_name,
                product_image: row.product_image,
                quantity: row.quantity,
                unit_price: row.unit_price,
            });
        }

        Ok(orders
            .into_iter()
            .map(|row| Order {
                items: by_order.remove(&row.id).unwrap_or_default(),
                id: row.id,
                status: row.status,
                total_amount: row.total_amount,
                created_at: row.created_at,
                items_count: row.items_count,
                total_items: row.total_items,
            })
            .collect())
    }
}
