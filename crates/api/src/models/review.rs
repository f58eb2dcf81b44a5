//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopsphere_core::{OrderId, ProductId, Rating, ReviewId, UserId};

use super::page::Pagination;

/// Maximum review title length, in characters.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum review body length, in characters.
pub const MAX_BODY_LEN: usize = 2000;
/// Maximum length of a single pro or con, in characters.
pub const MAX_POINT_LEN: usize = 200;

/// A product review (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub order_id: Option<OrderId>,
    pub rating: Rating,
    pub title: String,
    pub comment: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    /// Whether the order/product pair was confirmed against order items when
    /// the review was written. Never recomputed afterwards.
    pub verified_purchase: bool,
    pub helpful: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated review ready to be inserted.
///
/// `helpful` always starts at zero and the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub order_id: Option<OrderId>,
    pub rating: Rating,
    pub title: String,
    pub comment: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub verified_purchase: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated field changes for a review. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewChanges {
    pub rating: Option<Rating>,
    pub title: Option<String>,
    pub comment: Option<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
}

impl ReviewChanges {
    /// Apply these changes to a review in place.
    pub fn apply_to(&self, review: &mut Review, now: DateTime<Utc>) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(title) = &self.title {
            review.title.clone_from(title);
        }
        if let Some(comment) = &self.comment {
            review.comment.clone_from(comment);
        }
        if let Some(pros) = &self.pros {
            review.pros.clone_from(pros);
        }
        if let Some(cons) = &self.cons {
            review.cons.clone_from(cons);
        }
        review.updated_at = now;
    }
}

/// Ordering for a product's review list.
///
/// Every order breaks ties by creation time (newest first) and then by id
/// (descending), so pagination over equal keys is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    #[default]
    Recent,
    Oldest,
    Highest,
    Lowest,
    Helpful,
}

impl ReviewSort {
    /// Parse the `sort` query parameter. Unknown or missing values mean
    /// [`ReviewSort::Recent`].
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("oldest") => Self::Oldest,
            Some("highest") => Self::Highest,
            Some("lowest") => Self::Lowest,
            Some("helpful") => Self::Helpful,
            _ => Self::Recent,
        }
    }

    /// Total order over reviews for this sort, ties included.
    #[must_use]
    pub fn compare(self, a: &Review, b: &Review) -> std::cmp::Ordering {
        let primary = match self {
            Self::Recent => b.created_at.cmp(&a.created_at),
            Self::Oldest => a.created_at.cmp(&b.created_at),
            Self::Highest => b.rating.cmp(&a.rating),
            Self::Lowest => a.rating.cmp(&b.rating),
            Self::Helpful => b.helpful.cmp(&a.helpful),
        };
        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    }
}

/// Which reviews of a product to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewFilter {
    pub product_id: ProductId,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
}

impl ReviewFilter {
    /// Whether a review passes this filter.
    #[must_use]
    pub fn matches(&self, review: &Review) -> bool {
        let rating = review.rating.get();
        review.product_id == self.product_id
            && self.min_rating.is_none_or(|min| rating >= min)
            && self.max_rating.is_none_or(|max| rating <= max)
    }
}

/// A full product review listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewListQuery {
    pub filter: ReviewFilter,
    pub sort: ReviewSort,
    pub page: Pagination,
}

/// A free-text review search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Trimmed query text, at least two characters long.
    pub text: String,
    pub product_id: Option<ProductId>,
    pub page: Pagination,
}

/// Number of reviews per star rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingHistogram {
    counts: [u64; 5],
}

impl RatingHistogram {
    /// Add `count` reviews with the given rating.
    pub fn add(&mut self, rating: Rating, count: u64) {
        if let Some(slot) = self.slot_mut(rating) {
            *slot += count;
        }
    }

    /// Number of reviews with the given rating.
    #[must_use]
    pub fn count(&self, rating: Rating) -> u64 {
        usize::try_from(rating.get() - 1)
            .ok()
            .and_then(|i| self.counts.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of reviews.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Sum of all ratings.
    #[must_use]
    pub fn rating_sum(&self) -> u64 {
        Rating::all_descending()
            .into_iter()
            .map(|r| u64::from(r.get().unsigned_abs()) * self.count(r))
            .sum()
    }

    fn slot_mut(&mut self, rating: Rating) -> Option<&mut u64> {
        usize::try_from(rating.get() - 1)
            .ok()
            .and_then(|i| self.counts.get_mut(i))
    }
}

impl FromIterator<Rating> for RatingHistogram {
    fn from_iter<I: IntoIterator<Item = Rating>>(iter: I) -> Self {
        let mut histogram = Self::default();
        for rating in iter {
            histogram.add(rating, 1);
        }
        histogram
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn review(id: &str, rating: i64, helpful: i64, day: u32) -> Review {
        let at = Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0).unwrap();
        Review {
            id: ReviewId::new(id),
            product_id: ProductId::new(1),
            user_id: UserId::new(3),
            order_id: None,
            rating: Rating::new(rating).unwrap(),
            title: "Titolo".to_owned(),
            comment: "Commento".to_owned(),
            pros: vec![],
            cons: vec![],
            verified_purchase: false,
            helpful,
            created_at: at,
            updated_at: at,
        }
    }

    fn sorted(sort: ReviewSort, mut reviews: Vec<Review>) -> Vec<String> {
        reviews.sort_by(|a, b| sort.compare(a, b));
        reviews.into_iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn test_sort_from_param() {
        assert_eq!(ReviewSort::from_param(Some("helpful")), ReviewSort::Helpful);
        assert_eq!(ReviewSort::from_param(Some("bogus")), ReviewSort::Recent);
        assert_eq!(ReviewSort::from_param(None), ReviewSort::Recent);
    }

    #[test]
    fn test_highest_breaks_ties_by_recency_then_id() {
        let reviews = vec![
            review("a", 5, 0, 1),
            review("b", 5, 0, 3),
            review("c", 4, 0, 5),
            review("d", 5, 0, 3),
        ];
        assert_eq!(sorted(ReviewSort::Highest, reviews), ["d", "b", "a", "c"]);
    }

    #[test]
    fn test_oldest_and_helpful() {
        let reviews = vec![
            review("a", 3, 8, 2),
            review("b", 4, 12, 1),
            review("c", 5, 8, 3),
        ];
        assert_eq!(sorted(ReviewSort::Oldest, reviews.clone()), ["b", "a", "c"]);
        assert_eq!(sorted(ReviewSort::Helpful, reviews), ["b", "c", "a"]);
    }

    #[test]
    fn test_filter_rating_range() {
        let filter = ReviewFilter {
            product_id: ProductId::new(1),
            min_rating: Some(2),
            max_rating: Some(4),
        };
        assert!(filter.matches(&review("a", 3, 0, 1)));
        assert!(!filter.matches(&review("b", 5, 0, 1)));
        assert!(!filter.matches(&review("c", 1, 0, 1)));
    }

    #[test]
    fn test_histogram() {
        let histogram: RatingHistogram = [5, 4, 5]
            .into_iter()
            .map(|r| Rating::new(r).unwrap())
            .collect();
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.rating_sum(), 14);
        assert_eq!(histogram.count(Rating::new(5).unwrap()), 2);
        assert_eq!(histogram.count(Rating::new(1).unwrap()), 0);
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let mut r = review("a", 3, 0, 1);
        let later = Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap();
        let changes = ReviewChanges {
            rating: Some(Rating::new(1).unwrap()),
            ..ReviewChanges::default()
        };
        changes.apply_to(&mut r, later);
        assert_eq!(r.rating.get(), 1);
        assert_eq!(r.title, "Titolo");
        assert_eq!(r.updated_at, later);
    }
}
