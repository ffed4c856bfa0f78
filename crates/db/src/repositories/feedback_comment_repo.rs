//! Repository for the `feedback_comments` table.

use feedback_core::types::DbId;
use sqlx::PgPool;

use crate::models::feedback_comment::{CreateFeedbackComment, FeedbackComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, feedback_id, user_id, comment, created_at, updated_at";

/// Provides create/list operations for feedback comments.
pub struct FeedbackCommentRepo;

impl FeedbackCommentRepo {
    /// Add a comment by `user_id` to a feedback record.
    pub async fn create(
        pool: &PgPool,
        feedback_id: DbId,
        user_id: DbId,
        input: &CreateFeedbackComment,
    ) -> Result<FeedbackComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback_comments (feedback_id, user_id, comment)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedbackComment>(&query)
            .bind(feedback_id)
            .bind(user_id)
            .bind(&input.comment)
            .fetch_one(pool)
            .await
    }

    /// List all comments on a feedback record, oldest first.
    pub async fn list_for_feedback(
        pool: &PgPool,
        feedback_id: DbId,
    ) -> Result<Vec<FeedbackComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feedback_comments
             WHERE feedback_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, FeedbackComment>(&query)
            .bind(feedback_id)
            .fetch_all(pool)
            .await
    }
}
