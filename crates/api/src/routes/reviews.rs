//! Review route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use shopsphere_core::{ProductId, ReviewId, UserId};

use super::Envelope;
use crate::error::Result;
use crate::middleware::{Client, RequireAuth};
use crate::models::{
    Pagination, ProductSummary, Review, ReviewFilter, ReviewListQuery, ReviewSort,
};
use crate::services::aggregation::RatingSummary;
use crate::services::reviews::{CreateReview, ReviewService, UpdateReview};
use crate::services::search::SearchService;
use crate::state::AppState;

/// Query string of a product review listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
}

impl ListParams {
    fn into_query(self, product_id: ProductId) -> ReviewListQuery {
        ReviewListQuery {
            filter: ReviewFilter {
                product_id,
                min_rating: parse_int(self.min_rating.as_deref()),
                max_rating: parse_int(self.max_rating.as_deref()),
            },
            sort: ReviewSort::from_param(self.sort.as_deref()),
            page: Pagination::from_params(self.limit.as_deref(), self.offset.as_deref()),
        }
    }
}

/// Query string of a review search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub product_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

// Non-integer filter values are ignored rather than rejected
fn parse_int<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Serialize)]
pub struct ReviewData {
    review: Review,
}

#[derive(Debug, Serialize)]
pub struct ReviewsData {
    reviews: Vec<Review>,
}

/// Response of `GET /products/{productId}/reviews`.
#[derive(Debug, Serialize)]
pub struct ProductReviewsResponse {
    success: bool,
    product: ProductSummary,
    count: usize,
    total: u64,
    stats: RatingSummary,
    data: ReviewsData,
}

/// Response of `GET /reviews/search`.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    success: bool,
    query: String,
    count: usize,
    total: u64,
    data: ReviewsData,
}

/// Response of `GET /users/{userId}/reviews`.
#[derive(Debug, Serialize)]
pub struct UserReviewsResponse {
    success: bool,
    count: usize,
    data: ReviewsData,
}

/// List a product's reviews with rating stats.
///
/// GET /api/products/{productId}/reviews
pub async fn product_reviews(
    State(state): State<AppState>,
    path: std::result::Result<Path<ProductId>, PathRejection>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ProductReviewsResponse>> {
    let Path(product_id) = path?;
    let Query(params) = params?;

    let listing = ReviewService::new(state.stores())
        .list_for_product(&params.into_query(product_id))
        .await?;

    Ok(Json(ProductReviewsResponse {
        success: true,
        product: listing.product,
        count: listing.reviews.items.len(),
        total: listing.reviews.total,
        stats: listing.stats,
        data: ReviewsData {
            reviews: listing.reviews.items,
        },
    }))
}

/// Write a review of a product.
///
/// POST /api/products/{productId}/reviews
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(author): RequireAuth,
    Client(client): Client,
    path: std::result::Result<Path<ProductId>, PathRejection>,
    body: std::result::Result<Json<CreateReview>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<ReviewData>>)> {
    let Path(product_id) = path?;
    let Json(input) = body?;

    let review = ReviewService::new(state.stores())
        .create(&author, product_id, input, &client)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Review created successfully",
            ReviewData { review },
        )),
    ))
}

/// A single review.
///
/// GET /api/reviews/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<Envelope<ReviewData>>> {
    let review = ReviewService::new(state.stores()).get(&id).await?;
    Ok(Json(Envelope::data(ReviewData { review })))
}

/// Edit a review. Author or admin only.
///
/// PUT /api/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(id): Path<ReviewId>,
    body: std::result::Result<Json<UpdateReview>, JsonRejection>,
) -> Result<Json<Envelope<ReviewData>>> {
    let Json(changes) = body?;

    let review = ReviewService::new(state.stores())
        .update(&requester, &id, changes)
        .await?;

    Ok(Json(Envelope::with_message(
        "Review updated successfully",
        ReviewData { review },
    )))
}

/// Delete a review. Author or admin only.
///
/// DELETE /api/reviews/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(id): Path<ReviewId>,
) -> Result<Json<Envelope<()>>> {
    ReviewService::new(state.stores())
        .delete(&requester, &id)
        .await?;
    Ok(Json(Envelope::message("Review deleted successfully")))
}

/// Add a helpful vote. No authentication required.
///
/// POST /api/reviews/{id}/helpful
pub async fn helpful(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<Envelope<ReviewData>>> {
    let review = ReviewService::new(state.stores()).mark_helpful(&id).await?;
    Ok(Json(Envelope::with_message(
        "Review marked as helpful",
        ReviewData { review },
    )))
}

/// Full-text search over review titles and bodies.
///
/// GET /api/reviews/search
pub async fn search(
    State(state): State<AppState>,
    Client(client): Client,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(params) = params?;
    let page = Pagination::from_params(params.limit.as_deref(), params.offset.as_deref());
    let product_id = parse_int::<i32>(params.product_id.as_deref()).map(ProductId::new);

    let (query, results) = SearchService::new(state.stores())
        .search(params.q.as_deref(), product_id, page, &client)
        .await?;

    Ok(Json(SearchResponse {
        success: true,
        query: query.text,
        count: results.items.len(),
        total: results.total,
        data: ReviewsData {
            reviews: results.items,
        },
    }))
}

/// Every review a user wrote, newest first. Self or admin only.
///
/// GET /api/users/{userId}/reviews
pub async fn user_reviews(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    path: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<Json<UserReviewsResponse>> {
    let Path(user_id) = path?;

    let reviews = ReviewService::new(state.stores())
        .list_for_user(&requester, user_id)
        .await?;

    Ok(Json(UserReviewsResponse {
        success: true,
        count: reviews.len(),
        data: ReviewsData { reviews },
    }))
}
