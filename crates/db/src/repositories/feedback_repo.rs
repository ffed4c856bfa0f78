//! Repository for the `feedback` table.

use feedback_core::feedback::FeedbackScope;
use feedback_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::feedback::{CreateFeedback, Feedback, UpdateFeedback};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, manager_id, employee_id, strengths, areas_to_improve, \
                        overall_sentiment, acknowledged, acknowledged_at, created_at, updated_at";

/// Provides create/read/update operations for feedback. There is no
/// delete path.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert a new, unacknowledged feedback record authored by `manager_id`.
    pub async fn create(
        pool: &PgPool,
        manager_id: DbId,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback
                (manager_id, employee_id, strengths, areas_to_improve, overall_sentiment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(manager_id)
            .bind(input.employee_id)
            .bind(&input.strengths)
            .bind(&input.areas_to_improve)
            .bind(input.overall_sentiment.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a feedback record by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback WHERE id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the feedback visible within `scope`, newest first.
    pub async fn list_for_scope(
        pool: &PgPool,
        scope: FeedbackScope,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let (column, user_id) = match scope {
            FeedbackScope::AuthoredBy(id) => ("manager_id", id),
            FeedbackScope::ReceivedBy(id) => ("employee_id", id),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM feedback
             WHERE {column} = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update feedback content. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFeedback,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!(
            "UPDATE feedback SET
                strengths = COALESCE($2, strengths),
                areas_to_improve = COALESCE($3, areas_to_improve),
                overall_sentiment = COALESCE($4, overall_sentiment)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .bind(&input.strengths)
            .bind(&input.areas_to_improve)
            .bind(input.overall_sentiment.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Mark feedback acknowledged at `at`.
    ///
    /// Flag and timestamp are written in one statement so the row never
    /// has one without the other.
    pub async fn acknowledge(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!(
            "UPDATE feedback SET acknowledged = true, acknowledged_at = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(pool)
            .await
    }
}
