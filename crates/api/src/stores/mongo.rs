//! `MongoDB` implementation of the document-side stores.
//!
//! # Collections
//!
//! - `reviews` - one document per review, keyed by `ObjectId`
//! - `reviewcomments` - comments, `reviewId` holds the parent's `ObjectId`
//! - `activitylogs` - append-only activity entries
//!
//! Field names are camelCase, matching the documents already written by
//! earlier ShopSphere services. [`MongoStores::ensure_indexes`] creates the
//! indexes every query here relies on, including the unique
//! `(productId, userId)` index that backs the one-review-per-product rule.

use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document, doc};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shopsphere_core::{
    ActivityAction, CommentId, EntityType, OrderId, ProductId, Rating, ReviewId, UserId,
};

use super::{ActivityStore, CommentStore, ReviewStore, StoreError, bounded};
use crate::models::{
    Comment, NewActivity, NewComment, NewReview, Page, RatingHistogram, Review, ReviewChanges,
    ReviewFilter, ReviewListQuery, ReviewSort, SearchQuery,
};

const REVIEWS: &str = "reviews";
const COMMENTS: &str = "reviewcomments";
const ACTIVITY: &str = "activitylogs";

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

// =============================================================================
// Connection
// =============================================================================

/// A connected `MongoDB` database and the per-call timeout.
#[derive(Debug, Clone)]
pub struct MongoStores {
    db: Database,
    timeout: Duration,
}

impl MongoStores {
    /// Connect to `MongoDB`.
    ///
    /// Server selection and connection attempts are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Document` if the URI is invalid.
    pub async fn connect(
        uri: &SecretString,
        database: &str,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri.expose_secret()).await?;
        options.app_name = Some("shopsphere-api".to_owned());
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        Ok(Self {
            db: client.database(database),
            timeout,
        })
    }

    /// Create every index the adapters query through. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Document` if index creation fails, for example
    /// because existing data violates the unique review index.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.db
            .collection::<Document>(REVIEWS)
            .create_indexes(review_indexes())
            .await?;
        self.db
            .collection::<Document>(COMMENTS)
            .create_indexes(vec![index(doc! { "reviewId": 1, "createdAt": 1 }, None)])
            .await?;
        self.db
            .collection::<Document>(ACTIVITY)
            .create_indexes(vec![
                index(doc! { "userId": 1, "createdAt": -1 }, None),
                index(doc! { "action": 1, "createdAt": -1 }, None),
                index(doc! { "entityType": 1, "entityId": 1 }, None),
            ])
            .await?;
        Ok(())
    }

    /// Review store over the `reviews` collection.
    #[must_use]
    pub fn review_store(&self) -> MongoReviewStore {
        MongoReviewStore {
            db: self.db.clone(),
            collection: self.db.collection(REVIEWS),
            timeout: self.timeout,
        }
    }

    /// Comment store over the `reviewcomments` collection.
    #[must_use]
    pub fn comment_store(&self) -> MongoCommentStore {
        MongoCommentStore {
            collection: self.db.collection(COMMENTS),
            timeout: self.timeout,
        }
    }

    /// Activity store over the `activitylogs` collection.
    #[must_use]
    pub fn activity_store(&self) -> MongoActivityStore {
        MongoActivityStore {
            collection: self.db.collection(ACTIVITY),
            timeout: self.timeout,
        }
    }
}

fn index(keys: Document, options: Option<IndexOptions>) -> IndexModel {
    IndexModel::builder().keys(keys).options(options).build()
}

fn review_indexes() -> Vec<IndexModel> {
    vec![
        index(doc! { "productId": 1, "createdAt": -1 }, None),
        index(doc! { "userId": 1, "createdAt": -1 }, None),
        index(
            doc! { "productId": 1, "userId": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("one_review_per_user_product".to_owned())
                    .build(),
            ),
        ),
        index(
            doc! { "title": "text", "comment": "text" },
            Some(
                IndexOptions::builder()
                    .name("review_text".to_owned())
                    .build(),
            ),
        ),
    ]
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn parse_object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

// =============================================================================
// Documents
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    product_id: i32,
    user_id: i32,
    #[serde(default)]
    order_id: Option<i32>,
    rating: i32,
    title: String,
    comment: String,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
    #[serde(default)]
    verified_purchase: bool,
    #[serde(default)]
    helpful: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl From<&NewReview> for ReviewDocument {
    fn from(review: &NewReview) -> Self {
        Self {
            id: None,
            product_id: review.product_id.as_i32(),
            user_id: review.user_id.as_i32(),
            order_id: review.order_id.map(|o| o.as_i32()),
            rating: review.rating.get(),
            title: review.title.clone(),
            comment: review.comment.clone(),
            pros: review.pros.clone(),
            cons: review.cons.clone(),
            verified_purchase: review.verified_purchase,
            helpful: 0,
            created_at: review.created_at,
            updated_at: review.created_at,
        }
    }
}

impl TryFrom<ReviewDocument> for Review {
    type Error = StoreError;

    fn try_from(doc: ReviewDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::DataCorruption("review without _id".to_owned()))?;
        let rating = Rating::new(i64::from(doc.rating)).map_err(|e| {
            StoreError::DataCorruption(format!("review {} has invalid rating: {e}", id.to_hex()))
        })?;

        Ok(Self {
            id: ReviewId::new(id.to_hex()),
            product_id: ProductId::new(doc.product_id),
            user_id: UserId::new(doc.user_id),
            order_id: doc.order_id.map(OrderId::new),
            rating,
            title: doc.title,
            comment: doc.comment,
            pros: doc.pros,
            cons: doc.cons,
            verified_purchase: doc.verified_purchase,
            helpful: doc.helpful,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    review_id: ObjectId,
    user_id: i32,
    comment: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    updated_at: DateTime<Utc>,
}

impl TryFrom<CommentDocument> for Comment {
    type Error = StoreError;

    fn try_from(doc: CommentDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::DataCorruption("comment without _id".to_owned()))?;

        Ok(Self {
            id: CommentId::new(id.to_hex()),
            review_id: ReviewId::new(doc.review_id.to_hex()),
            user_id: UserId::new(doc.user_id),
            comment: doc.comment,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityDocument {
    user_id: Option<i32>,
    action: ActivityAction,
    entity_type: EntityType,
    entity_id: Option<String>,
    metadata: Map<String, Value>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

// =============================================================================
// Query building
// =============================================================================

fn review_filter(filter: &ReviewFilter) -> Document {
    let mut query = doc! { "productId": filter.product_id.as_i32() };
    let mut rating = Document::new();
    if let Some(min) = filter.min_rating {
        rating.insert("$gte", min);
    }
    if let Some(max) = filter.max_rating {
        rating.insert("$lte", max);
    }
    if !rating.is_empty() {
        query.insert("rating", rating);
    }
    query
}

fn review_sort(sort: ReviewSort) -> Document {
    match sort {
        ReviewSort::Recent => doc! { "createdAt": -1, "_id": -1 },
        ReviewSort::Oldest => doc! { "createdAt": 1, "_id": -1 },
        ReviewSort::Highest => doc! { "rating": -1, "createdAt": -1, "_id": -1 },
        ReviewSort::Lowest => doc! { "rating": 1, "createdAt": -1, "_id": -1 },
        ReviewSort::Helpful => doc! { "helpful": -1, "createdAt": -1, "_id": -1 },
    }
}

fn search_filter(query: &SearchQuery) -> Document {
    let mut filter = doc! { "$text": { "$search": query.text.as_str() } };
    if let Some(product) = query.product_id {
        filter.insert("productId", product.as_i32());
    }
    filter
}

fn review_set(changes: &ReviewChanges, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": bson::DateTime::from_chrono(now) };
    if let Some(rating) = changes.rating {
        set.insert("rating", rating.get());
    }
    if let Some(title) = &changes.title {
        set.insert("title", title.as_str());
    }
    if let Some(comment) = &changes.comment {
        set.insert("comment", comment.as_str());
    }
    if let Some(pros) = &changes.pros {
        set.insert("pros", pros.clone());
    }
    if let Some(cons) = &changes.cons {
        set.insert("cons", cons.clone());
    }
    set
}

fn as_i64(value: Option<&Bson>) -> Option<i64> {
    match value? {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        #[allow(clippy::cast_possible_truncation)] // ratings and counts are whole numbers
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

fn histogram_from_groups(groups: &[Document]) -> Result<RatingHistogram, StoreError> {
    let mut histogram = RatingHistogram::default();
    for group in groups {
        let rating = as_i64(group.get("_id"))
            .ok_or_else(|| StoreError::DataCorruption("rating group without _id".to_owned()))?;
        let count = as_i64(group.get("count"))
            .and_then(|c| u64::try_from(c).ok())
            .ok_or_else(|| StoreError::DataCorruption("rating group without count".to_owned()))?;
        let rating = Rating::new(rating)
            .map_err(|e| StoreError::DataCorruption(format!("stored rating: {e}")))?;
        histogram.add(rating, count);
    }
    Ok(histogram)
}

async fn collect_reviews(
    cursor: mongodb::Cursor<ReviewDocument>,
) -> Result<Vec<Review>, StoreError> {
    let docs: Vec<ReviewDocument> = cursor.try_collect().await?;
    docs.into_iter().map(Review::try_from).collect()
}

// =============================================================================
// Reviews
// =============================================================================

/// Reviews in `MongoDB`.
#[derive(Debug, Clone)]
pub struct MongoReviewStore {
    db: Database,
    collection: Collection<ReviewDocument>,
    timeout: Duration,
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    async fn ping(&self) -> Result<(), StoreError> {
        bounded(self.timeout, async {
            self.db.run_command(doc! { "ping": 1 }).await?;
            Ok(())
        })
        .await
    }

    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        bounded(self.timeout, async {
            let mut document = ReviewDocument::from(&review);
            let result = self.collection.insert_one(&document).await.map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::Conflict("review for this product and user".to_owned())
                } else {
                    StoreError::Document(e)
                }
            })?;
            document.id = result.inserted_id.as_object_id();
            Review::try_from(document)
        })
        .await
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(None);
        };
        bounded(self.timeout, async {
            let found = self.collection.find_one(doc! { "_id": oid }).await?;
            found.map(Review::try_from).transpose()
        })
        .await
    }

    async fn find_by_product_and_user(
        &self,
        product: ProductId,
        user: UserId,
    ) -> Result<Option<Review>, StoreError> {
        bounded(self.timeout, async {
            let found = self
                .collection
                .find_one(doc! { "productId": product.as_i32(), "userId": user.as_i32() })
                .await?;
            found.map(Review::try_from).transpose()
        })
        .await
    }

    async fn list_for_product(&self, query: &ReviewListQuery) -> Result<Page<Review>, StoreError> {
        let filter = review_filter(&query.filter);
        bounded(self.timeout, async {
            let (items, total) = tokio::try_join!(
                async {
                    let cursor = self
                        .collection
                        .find(filter.clone())
                        .sort(review_sort(query.sort))
                        .skip(query.page.offset)
                        .limit(i64::from(query.page.limit))
                        .await?;
                    collect_reviews(cursor).await
                },
                async {
                    Ok::<_, StoreError>(self.collection.count_documents(filter.clone()).await?)
                },
            )?;
            Ok(Page { items, total })
        })
        .await
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<Review>, StoreError> {
        bounded(self.timeout, async {
            let cursor = self
                .collection
                .find(doc! { "userId": user.as_i32() })
                .sort(doc! { "createdAt": -1, "_id": -1 })
                .await?;
            collect_reviews(cursor).await
        })
        .await
    }

    async fn update(
        &self,
        id: &ReviewId,
        changes: &ReviewChanges,
    ) -> Result<Option<Review>, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(None);
        };
        bounded(self.timeout, async {
            let updated = self
                .collection
                .find_one_and_update(
                    doc! { "_id": oid },
                    doc! { "$set": review_set(changes, Utc::now()) },
                )
                .return_document(ReturnDocument::After)
                .await?;
            updated.map(Review::try_from).transpose()
        })
        .await
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(false);
        };
        bounded(self.timeout, async {
            let result = self.collection.delete_one(doc! { "_id": oid }).await?;
            Ok(result.deleted_count > 0)
        })
        .await
    }

    async fn increment_helpful(&self, id: &ReviewId) -> Result<Option<Review>, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(None);
        };
        bounded(self.timeout, async {
            let updated = self
                .collection
                .find_one_and_update(doc! { "_id": oid }, doc! { "$inc": { "helpful": 1_i64 } })
                .return_document(ReturnDocument::After)
                .await?;
            updated.map(Review::try_from).transpose()
        })
        .await
    }

    async fn rating_histogram(&self, product: ProductId) -> Result<RatingHistogram, StoreError> {
        bounded(self.timeout, async {
            let pipeline = vec![
                doc! { "$match": { "productId": product.as_i32() } },
                doc! { "$group": { "_id": "$rating", "count": { "$sum": 1 } } },
            ];
            let groups: Vec<Document> = self
                .collection
                .aggregate(pipeline)
                .await?
                .try_collect()
                .await?;
            histogram_from_groups(&groups)
        })
        .await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Page<Review>, StoreError> {
        let filter = search_filter(query);
        bounded(self.timeout, async {
            let (items, total) = tokio::try_join!(
                async {
                    let cursor = self
                        .collection
                        .find(filter.clone())
                        .projection(doc! { "score": { "$meta": "textScore" } })
                        .sort(doc! { "score": { "$meta": "textScore" } })
                        .skip(query.page.offset)
                        .limit(i64::from(query.page.limit))
                        .await?;
                    collect_reviews(cursor).await
                },
                async {
                    Ok::<_, StoreError>(self.collection.count_documents(filter.clone()).await?)
                },
            )?;
            Ok(Page { items, total })
        })
        .await
    }
}

// =============================================================================
// Comments
// =============================================================================

/// Review comments in `MongoDB`.
#[derive(Debug, Clone)]
pub struct MongoCommentStore {
    collection: Collection<CommentDocument>,
    timeout: Duration,
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let review_id = parse_object_id(comment.review_id.as_str()).ok_or_else(|| {
            StoreError::DataCorruption(format!("review id {} is not an ObjectId", comment.review_id))
        })?;
        bounded(self.timeout, async {
            let now = Utc::now();
            let mut document = CommentDocument {
                id: None,
                review_id,
                user_id: comment.user_id.as_i32(),
                comment: comment.comment,
                created_at: now,
                updated_at: now,
            };
            let result = self.collection.insert_one(&document).await?;
            document.id = result.inserted_id.as_object_id();
            Comment::try_from(document)
        })
        .await
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(None);
        };
        bounded(self.timeout, async {
            let found = self.collection.find_one(doc! { "_id": oid }).await?;
            found.map(Comment::try_from).transpose()
        })
        .await
    }

    async fn list_for_review(&self, review: &ReviewId) -> Result<Vec<Comment>, StoreError> {
        let Some(oid) = parse_object_id(review.as_str()) else {
            return Ok(Vec::new());
        };
        bounded(self.timeout, async {
            let docs: Vec<CommentDocument> = self
                .collection
                .find(doc! { "reviewId": oid })
                .sort(doc! { "createdAt": 1, "_id": 1 })
                .await?
                .try_collect()
                .await?;
            docs.into_iter().map(Comment::try_from).collect()
        })
        .await
    }

    async fn update_text(
        &self,
        id: &CommentId,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(None);
        };
        bounded(self.timeout, async {
            let updated = self
                .collection
                .find_one_and_update(
                    doc! { "_id": oid },
                    doc! { "$set": {
                        "comment": text,
                        "updatedAt": bson::DateTime::from_chrono(Utc::now()),
                    } },
                )
                .return_document(ReturnDocument::After)
                .await?;
            updated.map(Comment::try_from).transpose()
        })
        .await
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, StoreError> {
        let Some(oid) = parse_object_id(id.as_str()) else {
            return Ok(false);
        };
        bounded(self.timeout, async {
            let result = self.collection.delete_one(doc! { "_id": oid }).await?;
            Ok(result.deleted_count > 0)
        })
        .await
    }
}

// =============================================================================
// Activity
// =============================================================================

/// Activity log in `MongoDB`.
#[derive(Debug, Clone)]
pub struct MongoActivityStore {
    collection: Collection<ActivityDocument>,
    timeout: Duration,
}

#[async_trait]
impl ActivityStore for MongoActivityStore {
    async fn append(&self, entry: NewActivity) -> Result<(), StoreError> {
        let document = ActivityDocument {
            user_id: entry.user_id.map(|u| u.as_i32()),
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            metadata: entry.metadata,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            created_at: Utc::now(),
        };
        bounded(self.timeout, async {
            self.collection.insert_one(&document).await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_review_filter_with_rating_range() {
        let filter = review_filter(&ReviewFilter {
            product_id: ProductId::new(1),
            min_rating: Some(4),
            max_rating: None,
        });
        assert_eq!(filter, doc! { "productId": 1, "rating": { "$gte": 4 } });
    }

    #[test]
    fn test_review_filter_without_range() {
        let filter = review_filter(&ReviewFilter {
            product_id: ProductId::new(2),
            min_rating: None,
            max_rating: None,
        });
        assert_eq!(filter, doc! { "productId": 2 });
    }

    #[test]
    fn test_every_sort_ends_with_recency_and_id() {
        for sort in [
            ReviewSort::Recent,
            ReviewSort::Highest,
            ReviewSort::Lowest,
            ReviewSort::Helpful,
        ] {
            let sorted = review_sort(sort);
            let keys: Vec<&String> = sorted.keys().collect();
            let tail: Vec<&str> = keys.iter().rev().take(2).map(|k| k.as_str()).collect();
            assert_eq!(tail, ["_id", "createdAt"], "{sort:?}");
            assert_eq!(review_sort(sort).get_i32("createdAt").unwrap(), -1);
        }
        assert_eq!(review_sort(ReviewSort::Oldest).get_i32("createdAt").unwrap(), 1);
    }

    #[test]
    fn test_search_filter_scopes_product() {
        let query = SearchQuery {
            text: "fotocamera".to_owned(),
            product_id: Some(ProductId::new(1)),
            page: crate::models::Pagination::default(),
        };
        assert_eq!(
            search_filter(&query),
            doc! { "$text": { "$search": "fotocamera" }, "productId": 1 }
        );
    }

    #[test]
    fn test_review_set_only_present_fields() {
        let changes = ReviewChanges {
            title: Some("Nuovo titolo".to_owned()),
            ..ReviewChanges::default()
        };
        let set = review_set(&changes, Utc::now());
        assert!(set.contains_key("updatedAt"));
        assert_eq!(set.get_str("title").unwrap(), "Nuovo titolo");
        assert!(!set.contains_key("rating"));
        assert!(!set.contains_key("pros"));
    }

    #[test]
    fn test_histogram_from_groups() {
        let groups = vec![
            doc! { "_id": 5, "count": 1 },
            doc! { "_id": 4_i64, "count": 1_i64 },
            doc! { "_id": 3.0, "count": 2 },
        ];
        let histogram = histogram_from_groups(&groups).unwrap();
        assert_eq!(histogram.total(), 4);
        assert_eq!(histogram.count(Rating::new(3).unwrap()), 2);
    }

    #[test]
    fn test_histogram_rejects_bad_rating() {
        let groups = vec![doc! { "_id": 9, "count": 1 }];
        assert!(matches!(
            histogram_from_groups(&groups),
            Err(StoreError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_review_document_with_invalid_rating_is_corrupt() {
        let now = Utc::now();
        let document = ReviewDocument {
            id: Some(ObjectId::new()),
            product_id: 1,
            user_id: 3,
            order_id: Some(1),
            rating: 7,
            title: "Titolo".to_owned(),
            comment: "Commento".to_owned(),
            pros: vec![],
            cons: vec![],
            verified_purchase: true,
            helpful: 0,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Review::try_from(document),
            Err(StoreError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_unparseable_ids() {
        assert!(parse_object_id("not-an-object-id").is_none());
        assert!(parse_object_id(&ObjectId::new().to_hex()).is_some());
    }
}
