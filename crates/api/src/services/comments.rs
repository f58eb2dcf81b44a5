//! Comments under reviews.

use serde::Deserialize;
use tracing::instrument;

use shopsphere_core::{CommentId, ReviewId};

use super::authz::Identity;
use super::{ServiceError, required_text};
use crate::models::comment::MAX_COMMENT_LEN;
use crate::models::{Comment, NewComment};
use crate::stores::Stores;

/// Body of a comment create or update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentBody {
    pub comment: Option<String>,
}

impl CommentBody {
    fn text(&self) -> Result<String, ServiceError> {
        let text = self.comment.as_deref().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Comment text is required".to_owned(),
            ));
        }
        required_text("Comment", text, MAX_COMMENT_LEN)
    }
}

/// Comment service.
pub struct CommentService<'a> {
    stores: &'a Stores,
}

impl<'a> CommentService<'a> {
    /// Create a comment service over the given stores.
    #[must_use]
    pub const fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    async fn require_review(&self, review: &ReviewId) -> Result<(), ServiceError> {
        match self.stores.reviews.find_by_id(review).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound("Review not found".to_owned())),
        }
    }

    async fn owned_comment(
        &self,
        requester: &Identity,
        id: &CommentId,
        verb: &str,
    ) -> Result<Comment, ServiceError> {
        let comment = self
            .stores
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(comment_not_found)?;
        if !requester.may_act_for(comment.user_id) {
            return Err(ServiceError::Forbidden(format!(
                "You can only {verb} your own comments"
            )));
        }
        Ok(comment)
    }

    /// Comments under a review, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the review does not exist, even if
    /// orphaned comments for it remain.
    pub async fn list(&self, review: &ReviewId) -> Result<Vec<Comment>, ServiceError> {
        self.require_review(review).await?;
        Ok(self.stores.comments.list_for_review(review).await?)
    }

    /// Comment on a review.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for empty or overlong text and
    /// `ServiceError::NotFound` if the review does not exist.
    #[instrument(skip_all, fields(review_id = %review, user_id = %author.id))]
    pub async fn create(
        &self,
        author: &Identity,
        review: &ReviewId,
        body: &CommentBody,
    ) -> Result<Comment, ServiceError> {
        let text = body.text()?;
        self.require_review(review).await?;

        let comment = self
            .stores
            .comments
            .insert(NewComment {
                review_id: review.clone(),
                user_id: author.id,
                comment: text,
            })
            .await?;
        tracing::info!(comment_id = %comment.id, "Comment created");
        Ok(comment)
    }

    /// Replace a comment's text. Author or admin only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound`, `ServiceError::Forbidden` or
    /// `ServiceError::Validation`.
    #[instrument(skip_all, fields(comment_id = %id, user_id = %requester.id))]
    pub async fn update(
        &self,
        requester: &Identity,
        id: &CommentId,
        body: &CommentBody,
    ) -> Result<Comment, ServiceError> {
        let text = body.text()?;
        self.owned_comment(requester, id, "update").await?;
        self.stores
            .comments
            .update_text(id, &text)
            .await?
            .ok_or_else(comment_not_found)
    }

    /// Delete a comment. Author or admin only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` or `ServiceError::Forbidden`.
    #[instrument(skip_all, fields(comment_id = %id, user_id = %requester.id))]
    pub async fn delete(&self, requester: &Identity, id: &CommentId) -> Result<(), ServiceError> {
        self.owned_comment(requester, id, "delete").await?;
        if !self.stores.comments.delete(id).await? {
            return Err(comment_not_found());
        }
        Ok(())
    }
}

fn comment_not_found() -> ServiceError {
    ServiceError::NotFound("Comment not found".to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopsphere_core::{ProductId, UserId};

    use super::*;
    use crate::models::ClientInfo;
    use crate::services::reviews::{CreateReview, ReviewService};
    use crate::testing::{admin, customer, seeded};

    fn body(text: &str) -> CommentBody {
        CommentBody {
            comment: Some(text.to_owned()),
        }
    }

    async fn review(stores: &Stores) -> ReviewId {
        ReviewService::new(stores)
            .create(
                &customer(3),
                ProductId::new(1),
                CreateReview {
                    rating: Some(5),
                    title: Some("Ottimo".to_owned()),
                    comment: Some("Consigliato".to_owned()),
                    ..CreateReview::default()
                },
                &ClientInfo::default(),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_trims_and_lists_in_order() {
        let memory = seeded().await;
        let stores = memory.stores();
        let review = review(&stores).await;
        let service = CommentService::new(&stores);

        let first = service
            .create(&customer(4), &review, &body("  Concordo pienamente  "))
            .await
            .unwrap();
        assert_eq!(first.comment, "Concordo pienamente");
        service
            .create(&customer(5), &review, &body("Anche per me"))
            .await
            .unwrap();

        let listed = service.list(&review).await.unwrap();
        let authors: Vec<UserId> = listed.iter().map(|c| c.user_id).collect();
        assert_eq!(authors, [UserId::new(4), UserId::new(5)]);
    }

    #[tokio::test]
    async fn test_empty_and_overlong_text() {
        let memory = seeded().await;
        let stores = memory.stores();
        let review = review(&stores).await;
        let service = CommentService::new(&stores);

        for bad in [body("   "), CommentBody::default(), body(&"a".repeat(1001))] {
            assert!(matches!(
                service.create(&customer(4), &review, &bad).await,
                Err(ServiceError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_comment_on_missing_review() {
        let memory = seeded().await;
        let stores = memory.stores();
        let missing = ReviewId::new("65f0c0ffee0000000000beef");
        let service = CommentService::new(&stores);

        assert!(matches!(
            service.create(&customer(4), &missing, &body("Ciao")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.list(&missing).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_after_review_deletion_is_not_found() {
        let memory = seeded().await;
        let stores = memory.stores();
        let review = review(&stores).await;
        let service = CommentService::new(&stores);
        service
            .create(&customer(4), &review, &body("Resto qui"))
            .await
            .unwrap();

        ReviewService::new(&stores)
            .delete(&customer(3), &review)
            .await
            .unwrap();
        assert!(matches!(
            service.list(&review).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_ownership() {
        let memory = seeded().await;
        let stores = memory.stores();
        let review = review(&stores).await;
        let service = CommentService::new(&stores);
        let comment = service
            .create(&customer(4), &review, &body("Prima versione"))
            .await
            .unwrap();

        assert!(matches!(
            service
                .update(&customer(3), &comment.id, &body("Dirottato"))
                .await,
            Err(ServiceError::Forbidden(_))
        ));
        let updated = service
            .update(&customer(4), &comment.id, &body("Seconda versione"))
            .await
            .unwrap();
        assert_eq!(updated.comment, "Seconda versione");

        assert!(matches!(
            service.delete(&customer(5), &comment.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        service.delete(&admin(), &comment.id).await.unwrap();
        assert!(matches!(
            service.delete(&admin(), &comment.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
