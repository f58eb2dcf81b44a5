//! Catalog repository: products and categories.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use shopsphere_core::{CategoryId, ProductId};

use crate::models::{Category, Product, ProductSummary};
use crate::stores::StoreError;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    category_id: CategoryId,
    category_name: String,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            category_name: row.category_name,
            name: row.name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
    product_count: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            product_count: row.product_count,
        }
    }
}

const CATEGORY_SELECT: &str = r"
    SELECT c.id, c.name, c.description,
           COUNT(p.id) FILTER (WHERE p.is_active) AS product_count
    FROM categories c
    LEFT JOIN products p ON p.category_id = c.id
";

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Product id and name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn product_summary(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductSummary>, StoreError> {
        let row = sqlx::query_as::<_, (ProductId, String)>(
            "SELECT id, name FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, name)| ProductSummary { id, name }))
    }

    /// Full product record joined with its category.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.category_id, c.name AS category_name, p.name, p.description,
                   p.price, p.stock_quantity, p.image_url, p.is_active,
                   p.created_at, p.updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// All categories, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "{CATEGORY_SELECT} GROUP BY c.id ORDER BY c.name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// A single category.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "{CATEGORY_SELECT} WHERE c.id = $1 GROUP BY c.id"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }
}
