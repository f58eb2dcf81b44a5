//! Review lifecycle: create, read, update, delete, helpful votes, listings.

use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use shopsphere_core::{
    ActivityAction, EntityType, OrderId, Patch, ProductId, Rating, ReviewId, UserId,
};

use super::aggregation::{RatingSummary, aggregate};
use super::authz::Identity;
use super::purchase::PurchaseVerifier;
use super::{ServiceError, activity, required_text};
use crate::models::review::{MAX_BODY_LEN, MAX_POINT_LEN, MAX_TITLE_LEN};
use crate::models::{
    ClientInfo, NewActivity, NewReview, Page, ProductSummary, Review, ReviewChanges,
    ReviewListQuery,
};
use crate::stores::{StoreError, Stores};

const ALREADY_REVIEWED: &str = "You have already reviewed this product";

/// Body of a review creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub rating: Option<i64>,
    pub title: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    pub order_id: Option<OrderId>,
}

/// Body of a review update. Only fields that are sent are changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReview {
    #[serde(default)]
    pub rating: Patch<i64>,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub comment: Patch<String>,
    #[serde(default)]
    pub pros: Patch<Vec<String>>,
    #[serde(default)]
    pub cons: Patch<Vec<String>>,
}

/// A product's review page together with its rating stats.
#[derive(Debug, Clone)]
pub struct ProductReviews {
    pub product: ProductSummary,
    pub reviews: Page<Review>,
    pub stats: RatingSummary,
}

fn validate_rating(value: i64) -> Result<Rating, ServiceError> {
    Rating::new(value).map_err(|_| {
        ServiceError::Validation(format!(
            "Rating must be between {} and {}",
            Rating::MIN,
            Rating::MAX
        ))
    })
}

/// Trim each point, drop blank ones and enforce the per-point limit.
fn validate_points(field: &str, points: Vec<String>) -> Result<Vec<String>, ServiceError> {
    points
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(|p| {
            if p.chars().count() > MAX_POINT_LEN {
                Err(ServiceError::Validation(format!(
                    "Each of {field} must be at most {MAX_POINT_LEN} characters"
                )))
            } else {
                Ok(p.to_owned())
            }
        })
        .collect()
}

impl UpdateReview {
    fn validate(self) -> Result<ReviewChanges, ServiceError> {
        Ok(ReviewChanges {
            rating: self.rating.try_map(validate_rating)?.into_option(),
            title: self
                .title
                .try_map(|t| required_text("Title", &t, MAX_TITLE_LEN))?
                .into_option(),
            comment: self
                .comment
                .try_map(|c| required_text("Comment", &c, MAX_BODY_LEN))?
                .into_option(),
            pros: self
                .pros
                .try_map(|p| validate_points("pros", p))?
                .into_option(),
            cons: self
                .cons
                .try_map(|c| validate_points("cons", c))?
                .into_option(),
        })
    }
}

/// Review service.
pub struct ReviewService<'a> {
    stores: &'a Stores,
}

impl<'a> ReviewService<'a> {
    /// Create a review service over the given stores.
    #[must_use]
    pub const fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write a review of `product_id` as `author`.
    ///
    /// If an order id is given, the order is checked against the author's
    /// order history and the result is stored as `verifiedPurchase`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a missing or out-of-range field,
    /// `ServiceError::NotFound` if the product does not exist, and
    /// `ServiceError::Conflict` if the author already reviewed the product.
    #[instrument(skip_all, fields(product_id = %product_id, user_id = %author.id))]
    pub async fn create(
        &self,
        author: &Identity,
        product_id: ProductId,
        input: CreateReview,
        client: &ClientInfo,
    ) -> Result<Review, ServiceError> {
        let (Some(rating), Some(title), Some(comment)) = (input.rating, input.title, input.comment)
        else {
            return Err(ServiceError::Validation(
                "Rating, title and comment are required".to_owned(),
            ));
        };
        let rating = validate_rating(rating)?;
        let title = required_text("Title", &title, MAX_TITLE_LEN)?;
        let comment = required_text("Comment", &comment, MAX_BODY_LEN)?;
        let pros = validate_points("pros", input.pros)?;
        let cons = validate_points("cons", input.cons)?;

        if self
            .stores
            .relational
            .product_summary(product_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::NotFound("Product not found".to_owned()));
        }

        if self
            .stores
            .reviews
            .find_by_product_and_user(product_id, author.id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(ALREADY_REVIEWED.to_owned()));
        }

        let verified_purchase = PurchaseVerifier::new(self.stores.relational.as_ref())
            .verify(author.id, product_id, input.order_id)
            .await?;

        let review = self
            .stores
            .reviews
            .insert(NewReview {
                product_id,
                user_id: author.id,
                order_id: input.order_id,
                rating,
                title,
                comment,
                pros,
                cons,
                verified_purchase,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => ServiceError::Conflict(ALREADY_REVIEWED.to_owned()),
                other => ServiceError::Infrastructure(other),
            })?;

        tracing::info!(review_id = %review.id, verified_purchase, "Review created");
        activity::record(
            self.stores.activity.as_ref(),
            NewActivity::new(Some(author.id), ActivityAction::AddReview)
                .entity(EntityType::Review, &review.id)
                .meta("productId", product_id.as_i32())
                .meta("rating", review.rating.get())
                .client(client),
        )
        .await;

        Ok(review)
    }

    /// Change some fields of a review. Author or admin only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound`, `ServiceError::Forbidden`, or
    /// `ServiceError::Validation` for a sent field with an invalid value.
    #[instrument(skip_all, fields(review_id = %id, user_id = %requester.id))]
    pub async fn update(
        &self,
        requester: &Identity,
        id: &ReviewId,
        changes: UpdateReview,
    ) -> Result<Review, ServiceError> {
        let review = self.get(id).await?;
        if !requester.may_act_for(review.user_id) {
            return Err(ServiceError::Forbidden(
                "You can only update your own reviews".to_owned(),
            ));
        }

        let changes = changes.validate()?;
        self.stores
            .reviews
            .update(id, &changes)
            .await?
            .ok_or_else(review_not_found)
    }

    /// Delete a review. Author or admin only. Its comments are left in place.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` or `ServiceError::Forbidden`.
    #[instrument(skip_all, fields(review_id = %id, user_id = %requester.id))]
    pub async fn delete(&self, requester: &Identity, id: &ReviewId) -> Result<(), ServiceError> {
        let review = self.get(id).await?;
        if !requester.may_act_for(review.user_id) {
            return Err(ServiceError::Forbidden(
                "You can only delete your own reviews".to_owned(),
            ));
        }

        if !self.stores.reviews.delete(id).await? {
            return Err(review_not_found());
        }
        tracing::info!("Review deleted");
        Ok(())
    }

    /// Add one helpful vote. Anyone may vote, any number of times.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the review does not exist.
    pub async fn mark_helpful(&self, id: &ReviewId) -> Result<Review, ServiceError> {
        self.stores
            .reviews
            .increment_helpful(id)
            .await?
            .ok_or_else(review_not_found)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A single review.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the review does not exist.
    pub async fn get(&self, id: &ReviewId) -> Result<Review, ServiceError> {
        self.stores
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(review_not_found)
    }

    /// A page of a product's reviews plus stats over all of its reviews.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    #[instrument(skip_all, fields(product_id = %query.filter.product_id))]
    pub async fn list_for_product(
        &self,
        query: &ReviewListQuery,
    ) -> Result<ProductReviews, ServiceError> {
        let product = self
            .stores
            .relational
            .product_summary(query.filter.product_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product not found".to_owned()))?;

        let (reviews, stats) = tokio::try_join!(
            async { Ok::<_, ServiceError>(self.stores.reviews.list_for_product(query).await?) },
            aggregate(self.stores.reviews.as_ref(), query.filter.product_id),
        )?;

        Ok(ProductReviews {
            product,
            reviews,
            stats,
        })
    }

    /// Every review written by `user`, newest first. Self or admin only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Forbidden` if the requester is neither.
    pub async fn list_for_user(
        &self,
        requester: &Identity,
        user: UserId,
    ) -> Result<Vec<Review>, ServiceError> {
        if !requester.may_act_for(user) {
            return Err(ServiceError::Forbidden(
                "You can only view your own reviews".to_owned(),
            ));
        }
        Ok(self.stores.reviews.list_for_user(user).await?)
    }
}

fn review_not_found() -> ServiceError {
    ServiceError::NotFound("Review not found".to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use shopsphere_core::Role;

    use super::*;
    use crate::models::{Pagination, RatingHistogram, ReviewFilter, ReviewSort, SearchQuery};
    use crate::stores::ReviewStore;
    use crate::stores::memory::MemoryReviewStore;
    use crate::testing::{admin, customer, identity, seeded};

    fn input(rating: i64) -> CreateReview {
        CreateReview {
            rating: Some(rating),
            title: Some("  Ottimo telefono ".to_owned()),
            comment: Some("La fotocamera è eccezionale".to_owned()),
            pros: vec!["Fotocamera".to_owned(), "  ".to_owned()],
            cons: vec!["Prezzo".to_owned()],
            order_id: None,
        }
    }

    fn list_query(product: i32) -> ReviewListQuery {
        ReviewListQuery {
            filter: ReviewFilter {
                product_id: ProductId::new(product),
                min_rating: None,
                max_rating: None,
            },
            sort: ReviewSort::Recent,
            page: Pagination::default(),
        }
    }

    #[tokio::test]
    async fn test_rating_out_of_range_is_rejected() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);

        for bad in [0, 6, -1] {
            let result = service
                .create(&customer(3), ProductId::new(1), input(bad), &ClientInfo::default())
                .await;
            assert!(matches!(result, Err(ServiceError::Validation(_))), "{bad}");
        }
        for (user, good) in [(3, 1), (4, 5)] {
            service
                .create(&customer(user), ProductId::new(1), input(good), &ClientInfo::default())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);

        let mut no_title = input(4);
        no_title.title = Some("   ".to_owned());
        let result = service
            .create(&customer(3), ProductId::new(1), no_title, &ClientInfo::default())
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));

        let result = service
            .create(
                &customer(3),
                ProductId::new(1),
                CreateReview::default(),
                &ClientInfo::default(),
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let memory = seeded().await;
        let stores = memory.stores();
        let result = ReviewService::new(&stores)
            .create(&customer(3), ProductId::new(999), input(4), &ClientInfo::default())
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_second_review_conflicts() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);

        service
            .create(&customer(3), ProductId::new(1), input(5), &ClientInfo::default())
            .await
            .unwrap();
        let again = service
            .create(&customer(3), ProductId::new(1), input(2), &ClientInfo::default())
            .await;
        assert!(matches!(again, Err(ServiceError::Conflict(m)) if m == ALREADY_REVIEWED));
    }

    /// Review store whose duplicate lookup never finds anything, as when two
    /// requests for the same product and user race past it.
    struct RacingLookup(MemoryReviewStore);

    #[async_trait]
    impl ReviewStore for RacingLookup {
        async fn ping(&self) -> Result<(), StoreError> {
            self.0.ping().await
        }
        async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
            self.0.insert(review).await
        }
        async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, StoreError> {
            self.0.find_by_id(id).await
        }
        async fn find_by_product_and_user(
            &self,
            _product: ProductId,
            _user: UserId,
        ) -> Result<Option<Review>, StoreError> {
            Ok(None)
        }
        async fn list_for_product(
            &self,
            query: &ReviewListQuery,
        ) -> Result<Page<Review>, StoreError> {
            self.0.list_for_product(query).await
        }
        async fn list_for_user(&self, user: UserId) -> Result<Vec<Review>, StoreError> {
            self.0.list_for_user(user).await
        }
        async fn update(
            &self,
            id: &ReviewId,
            changes: &ReviewChanges,
        ) -> Result<Option<Review>, StoreError> {
            self.0.update(id, changes).await
        }
        async fn delete(&self, id: &ReviewId) -> Result<bool, StoreError> {
            self.0.delete(id).await
        }
        async fn increment_helpful(&self, id: &ReviewId) -> Result<Option<Review>, StoreError> {
            self.0.increment_helpful(id).await
        }
        async fn rating_histogram(
            &self,
            product: ProductId,
        ) -> Result<RatingHistogram, StoreError> {
            self.0.rating_histogram(product).await
        }
        async fn search(&self, query: &SearchQuery) -> Result<Page<Review>, StoreError> {
            self.0.search(query).await
        }
    }

    #[tokio::test]
    async fn test_insert_conflict_past_lookup_is_a_conflict() {
        let memory = seeded().await;
        let stores = Stores {
            reviews: Arc::new(RacingLookup(memory.reviews.clone())),
            ..memory.stores()
        };
        let service = ReviewService::new(&stores);

        service
            .create(&customer(3), ProductId::new(1), input(5), &ClientInfo::default())
            .await
            .unwrap();
        let again = service
            .create(&customer(3), ProductId::new(1), input(2), &ClientInfo::default())
            .await;
        assert!(matches!(again, Err(ServiceError::Conflict(m)) if m == ALREADY_REVIEWED));

        let page = memory.reviews.list_for_product(&list_query(1)).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(memory.activity.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);

        let mut body = input(4);
        body.order_id = Some(OrderId::new(1));
        let created = service
            .create(&customer(3), ProductId::new(1), body, &ClientInfo::default())
            .await
            .unwrap();
        let fetched = service.get(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.rating.get(), 4);
        assert_eq!(fetched.title, "Ottimo telefono");
        assert_eq!(fetched.pros, ["Fotocamera"]);
        assert_eq!(fetched.cons, ["Prezzo"]);
        assert!(fetched.verified_purchase);
        assert_eq!(fetched.helpful, 0);
    }

    #[tokio::test]
    async fn test_unmatched_order_is_created_unverified() {
        let memory = seeded().await;
        let stores = memory.stores();
        let mut body = input(3);
        body.order_id = Some(OrderId::new(2));
        let created = ReviewService::new(&stores)
            .create(&customer(3), ProductId::new(1), body, &ClientInfo::default())
            .await
            .unwrap();
        assert!(!created.verified_purchase);
        assert_eq!(created.order_id, Some(OrderId::new(2)));
    }

    #[tokio::test]
    async fn test_create_records_activity() {
        let memory = seeded().await;
        let stores = memory.stores();
        let client = ClientInfo {
            ip_address: Some("10.0.0.7".to_owned()),
            user_agent: Some("curl/8.0".to_owned()),
        };
        let review = ReviewService::new(&stores)
            .create(&customer(3), ProductId::new(1), input(5), &client)
            .await
            .unwrap();

        let entries = memory.activity.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, ActivityAction::AddReview);
        assert_eq!(entries[0].entity_id.as_deref(), Some(review.id.as_str()));
        assert_eq!(entries[0].ip_address.as_deref(), Some("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_activity_failure_does_not_fail_create() {
        let memory = seeded().await;
        memory.activity.set_unavailable(true);
        let stores = memory.stores();
        let created = ReviewService::new(&stores)
            .create(&customer(3), ProductId::new(1), input(5), &ClientInfo::default())
            .await;
        assert!(created.is_ok());
    }

    #[tokio::test]
    async fn test_update_is_author_or_admin() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        let review = service
            .create(&customer(3), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();

        let change = || UpdateReview {
            rating: Patch::Present(2),
            ..UpdateReview::default()
        };
        let forbidden = service.update(&customer(4), &review.id, change()).await;
        assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));

        let seller = service
            .update(&identity(5, Role::Seller), &review.id, change())
            .await;
        assert!(matches!(seller, Err(ServiceError::Forbidden(_))));

        let updated = service.update(&admin(), &review.id, change()).await.unwrap();
        assert_eq!(updated.rating.get(), 2);
        assert_eq!(updated.title, review.title);
        assert_eq!(updated.user_id, UserId::new(3));
    }

    #[tokio::test]
    async fn test_update_rejects_present_invalid_values() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        let review = service
            .create(&customer(3), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();

        let zero = UpdateReview {
            rating: Patch::Present(0),
            ..UpdateReview::default()
        };
        assert!(matches!(
            service.update(&customer(3), &review.id, zero).await,
            Err(ServiceError::Validation(_))
        ));

        let empty_title = UpdateReview {
            title: Patch::Present(String::new()),
            ..UpdateReview::default()
        };
        assert!(matches!(
            service.update(&customer(3), &review.id, empty_title).await,
            Err(ServiceError::Validation(_))
        ));

        assert_eq!(service.get(&review.id).await.unwrap().rating.get(), 4);
    }

    #[tokio::test]
    async fn test_repeated_put_changes_only_updated_at() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        let review = service
            .create(&customer(3), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();

        let body = || UpdateReview {
            title: Patch::Present("Rivisto".to_owned()),
            pros: Patch::Present(vec!["Schermo".to_owned()]),
            ..UpdateReview::default()
        };
        let first = service.update(&customer(3), &review.id, body()).await.unwrap();
        let second = service.update(&customer(3), &review.id, body()).await.unwrap();

        assert!(second.updated_at >= first.updated_at);
        assert_eq!(
            Review {
                updated_at: first.updated_at,
                ..second
            },
            first
        );
    }

    #[tokio::test]
    async fn test_delete_leaves_comments_orphaned() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        let review = service
            .create(&customer(3), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();
        stores
            .comments
            .insert(crate::models::NewComment {
                review_id: review.id.clone(),
                user_id: UserId::new(4),
                comment: "Concordo".to_owned(),
            })
            .await
            .unwrap();

        assert!(matches!(
            service.delete(&customer(4), &review.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        service.delete(&customer(3), &review.id).await.unwrap();

        assert!(matches!(
            service.get(&review.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(
            stores.comments.list_for_review(&review.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_admin_may_delete() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        let review = service
            .create(&customer(3), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();
        service.delete(&admin(), &review.id).await.unwrap();
        assert!(matches!(
            service.delete(&admin(), &review.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_helpful_votes_all_count() {
        let memory = seeded().await;
        let stores = memory.stores();
        let review = ReviewService::new(&stores)
            .create(&customer(3), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();

        let votes = (0..25).map(|_| {
            let stores = stores.clone();
            let id = review.id.clone();
            tokio::spawn(async move { ReviewService::new(&stores).mark_helpful(&id).await })
        });
        for vote in futures::future::join_all(votes).await {
            vote.unwrap().unwrap();
        }

        let after = ReviewService::new(&stores).get(&review.id).await.unwrap();
        assert_eq!(after.helpful, 25);
    }

    #[tokio::test]
    async fn test_helpful_on_missing_review() {
        let memory = seeded().await;
        let stores = memory.stores();
        let result = ReviewService::new(&stores)
            .mark_helpful(&ReviewId::new("65f0c0ffee0000000000beef"))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_for_product_with_stats() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        service
            .create(&customer(3), ProductId::new(1), input(5), &ClientInfo::default())
            .await
            .unwrap();
        service
            .create(&customer(4), ProductId::new(1), input(4), &ClientInfo::default())
            .await
            .unwrap();
        service
            .create(&customer(5), ProductId::new(2), input(1), &ClientInfo::default())
            .await
            .unwrap();

        let mut query = list_query(1);
        query.filter.min_rating = Some(5);
        let listed = service.list_for_product(&query).await.unwrap();

        assert_eq!(listed.product.name, "iPhone 15 Pro");
        assert_eq!(listed.reviews.total, 1);
        assert_eq!(listed.stats.total_reviews, 2);
        assert!((listed.stats.avg_rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(listed.stats.rating5, 1);
        assert_eq!(listed.stats.rating4, 1);
    }

    #[tokio::test]
    async fn test_list_for_product_without_reviews() {
        let memory = seeded().await;
        let stores = memory.stores();
        let listed = ReviewService::new(&stores)
            .list_for_product(&list_query(4))
            .await
            .unwrap();
        assert!(listed.reviews.items.is_empty());
        assert_eq!(listed.stats.total_reviews, 0);
        assert!(listed.stats.avg_rating.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_list_for_missing_product() {
        let memory = seeded().await;
        let stores = memory.stores();
        let result = ReviewService::new(&stores)
            .list_for_product(&list_query(999))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_for_user_is_self_or_admin() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = ReviewService::new(&stores);
        service
            .create(&customer(3), ProductId::new(1), input(5), &ClientInfo::default())
            .await
            .unwrap();
        service
            .create(&customer(3), ProductId::new(4), input(4), &ClientInfo::default())
            .await
            .unwrap();

        assert_eq!(
            service
                .list_for_user(&customer(3), UserId::new(3))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            service
                .list_for_user(&admin(), UserId::new(3))
                .await
                .unwrap()
                .len(),
            2
        );
        assert!(matches!(
            service.list_for_user(&customer(4), UserId::new(3)).await,
            Err(ServiceError::Forbidden(_))
        ));
    }
}
