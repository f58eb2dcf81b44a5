//! Product and category lookups.

use shopsphere_core::{CategoryId, ProductId};

use super::ServiceError;
use crate::models::{Category, Product};
use crate::stores::Stores;

/// Catalog lookup service.
pub struct CatalogService<'a> {
    stores: &'a Stores,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.stores
            .relational
            .product(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_owned()))
    }

    /// All categories, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Infrastructure` if the store fails.
    pub async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.stores.relational.categories().await?)
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the category does not exist.
    pub async fn category(&self, id: CategoryId) -> Result<Category, ServiceError> {
        self.stores
            .relational
            .category(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category not found".to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::seeded;

    #[tokio::test]
    async fn test_categories_sorted_with_counts() {
        let memory = seeded().await;
        let stores = memory.stores();
        let categories = CatalogService::new(&stores).categories().await.unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Abbigliamento", "Elettronica"]);
        assert_eq!(categories[1].product_count, 3);
        assert_eq!(categories[0].product_count, 0);
    }

    #[tokio::test]
    async fn test_lookups_not_found() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = CatalogService::new(&stores);
        assert!(matches!(
            service.product(ProductId::new(404)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.category(CategoryId::new(404)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(
            service.product(ProductId::new(4)).await.unwrap().name,
            "Sony WH-1000XM5"
        );
    }
}
