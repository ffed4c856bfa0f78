//! Feedback comment model and DTOs.

use feedback_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserResponse;

/// A row from the `feedback_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackComment {
    pub id: DbId,
    pub feedback_id: DbId,
    pub user_id: DbId,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackCommentWithAuthor {
    #[serde(flatten)]
    pub comment: FeedbackComment,
    pub user: UserResponse,
}

/// DTO for adding a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedbackComment {
    pub comment: String,
}
