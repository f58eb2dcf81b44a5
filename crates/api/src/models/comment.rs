//! Review comment domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopsphere_core::{CommentId, ReviewId, UserId};

/// Maximum comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 1000;

/// A comment under a review.
///
/// `review_id` is checked when the comment is written. Deleting the review
/// later leaves the comment in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, trimmed comment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub review_id: ReviewId,
    pub user_id: UserId,
    pub comment: String,
}
