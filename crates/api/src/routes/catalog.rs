//! Catalog route handlers: products and categories.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde::Serialize;

use shopsphere_core::{CategoryId, ProductId};

use super::Envelope;
use crate::error::Result;
use crate::models::{Category, Product};
use crate::services::catalog::CatalogService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProductData {
    product: Product,
}

#[derive(Debug, Serialize)]
pub struct CategoryData {
    category: Category,
}

#[derive(Debug, Serialize)]
pub struct CategoriesData {
    categories: Vec<Category>,
}

/// Response of `GET /categories`.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    success: bool,
    count: usize,
    data: CategoriesData,
}

/// GET /api/products/{productId}
pub async fn product(
    State(state): State<AppState>,
    path: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<Envelope<ProductData>>> {
    let Path(id) = path?;
    let product = CatalogService::new(state.stores()).product(id).await?;
    Ok(Json(Envelope::data(ProductData { product })))
}

/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> Result<Json<CategoriesResponse>> {
    let categories = CatalogService::new(state.stores()).categories().await?;
    Ok(Json(CategoriesResponse {
        success: true,
        count: categories.len(),
        data: CategoriesData { categories },
    }))
}

/// GET /api/categories/{id}
pub async fn category(
    State(state): State<AppState>,
    path: std::result::Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<Envelope<CategoryData>>> {
    let Path(id) = path?;
    let category = CatalogService::new(state.stores()).category(id).await?;
    Ok(Json(Envelope::data(CategoryData { category })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::routes::tests::{send, test_app};

    #[tokio::test]
    async fn test_catalog_routes() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/products/4", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["product"]["name"], "Sony WH-1000XM5");

        let (status, _) = send(&app, Method::GET, "/api/products/404", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/api/categories", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);

        let (status, _) = send(&app, Method::GET, "/api/categories/2", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
