//! Rating aggregation.
//!
//! Stats are recomputed from the review collection on every request; nothing
//! is cached or denormalized onto the product.

use serde::Serialize;

use shopsphere_core::{ProductId, Rating};

use super::ServiceError;
use crate::models::RatingHistogram;
use crate::stores::ReviewStore;

/// Mean rating and per-star counts for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Unrounded mean; `0.0` when there are no reviews.
    pub avg_rating: f64,
    pub total_reviews: u64,
    pub rating5: u64,
    pub rating4: u64,
    pub rating3: u64,
    pub rating2: u64,
    pub rating1: u64,
}

impl From<&RatingHistogram> for RatingSummary {
    fn from(histogram: &RatingHistogram) -> Self {
        let total = histogram.total();
        #[allow(clippy::cast_precision_loss)]
        let avg_rating = if total == 0 {
            0.0
        } else {
            histogram.rating_sum() as f64 / total as f64
        };
        let count = |star: i64| Rating::new(star).map_or(0, |r| histogram.count(r));

        Self {
            avg_rating,
            total_reviews: total,
            rating5: count(5),
            rating4: count(4),
            rating3: count(3),
            rating2: count(2),
            rating1: count(1),
        }
    }
}

/// Aggregate every review of `product`.
///
/// # Errors
///
/// Returns `ServiceError::Infrastructure` if the review store fails.
pub async fn aggregate(
    reviews: &dyn ReviewStore,
    product: ProductId,
) -> Result<RatingSummary, ServiceError> {
    let histogram = reviews.rating_histogram(product).await?;
    Ok(RatingSummary::from(&histogram))
}
