//! Review comment route handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use shopsphere_core::{CommentId, ReviewId};

use super::Envelope;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Comment;
use crate::services::comments::{CommentBody, CommentService};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CommentData {
    comment: Comment,
}

#[derive(Debug, Serialize)]
pub struct CommentsData {
    comments: Vec<Comment>,
}

/// Response of `GET /reviews/{reviewId}/comments`.
#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    success: bool,
    count: usize,
    data: CommentsData,
}

/// Comments on a review, oldest first.
///
/// GET /api/reviews/{reviewId}/comments
pub async fn index(
    State(state): State<AppState>,
    Path(review_id): Path<ReviewId>,
) -> Result<Json<CommentsResponse>> {
    let comments = CommentService::new(state.stores()).list(&review_id).await?;
    Ok(Json(CommentsResponse {
        success: true,
        count: comments.len(),
        data: CommentsData { comments },
    }))
}

/// POST /api/reviews/{reviewId}/comments
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(author): RequireAuth,
    Path(review_id): Path<ReviewId>,
    body: std::result::Result<Json<CommentBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<CommentData>>)> {
    let Json(body) = body?;
    let comment = CommentService::new(state.stores())
        .create(&author, &review_id, &body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Comment created successfully",
            CommentData { comment },
        )),
    ))
}

/// PUT /api/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(id): Path<CommentId>,
    body: std::result::Result<Json<CommentBody>, JsonRejection>,
) -> Result<Json<Envelope<CommentData>>> {
    let Json(body) = body?;
    let comment = CommentService::new(state.stores())
        .update(&requester, &id, &body)
        .await?;

    Ok(Json(Envelope::with_message(
        "Comment updated successfully",
        CommentData { comment },
    )))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Path(id): Path<CommentId>,
) -> Result<Json<Envelope<()>>> {
    CommentService::new(state.stores())
        .delete(&requester, &id)
        .await?;
    Ok(Json(Envelope::message("Comment deleted successfully")))
}
