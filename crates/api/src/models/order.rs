//! Order history read models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use shopsphere_core::{OrderId, OrderStatus, ProductId};

/// One line of an order, with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// An order as shown in a user's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub items_count: i64,
    pub total_items: i64,
    pub items: Vec<OrderItem>,
}
