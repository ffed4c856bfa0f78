//! Repository for the `feedback_requests` table.

use feedback_core::feedback_request::{RequestScope, RequestStatus};
use feedback_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::feedback_request::{CreateFeedbackRequest, FeedbackRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, manager_id, message, status, completed_at, \
                        created_at, updated_at";

/// Provides create/read/transition operations for feedback requests.
pub struct FeedbackRequestRepo;

impl FeedbackRequestRepo {
    /// Insert a new pending request from `employee_id` to `manager_id`.
    ///
    /// Fails with a unique violation on `uq_feedback_requests_pending` if a
    /// pending request for the same pair already exists.
    pub async fn create(
        pool: &PgPool,
        employee_id: DbId,
        manager_id: DbId,
        input: &CreateFeedbackRequest,
    ) -> Result<FeedbackRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback_requests (employee_id, manager_id, message, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedbackRequest>(&query)
            .bind(employee_id)
            .bind(manager_id)
            .bind(&input.message)
            .bind(RequestStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a request by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FeedbackRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback_requests WHERE id = $1");
        sqlx::query_as::<_, FeedbackRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a pending request exists for the (employee, manager) pair.
    pub async fn pending_exists(
        pool: &PgPool,
        employee_id: DbId,
        manager_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM feedback_requests
                WHERE employee_id = $1 AND manager_id = $2 AND status = $3
             )",
        )
        .bind(employee_id)
        .bind(manager_id)
        .bind(RequestStatus::Pending.as_str())
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List the requests visible within `scope`, all statuses, newest first.
    pub async fn list_for_scope(
        pool: &PgPool,
        scope: RequestScope,
    ) -> Result<Vec<FeedbackRequest>, sqlx::Error> {
        let (column, user_id) = match scope {
            RequestScope::TargetedAt(id) => ("manager_id", id),
            RequestScope::SubmittedBy(id) => ("employee_id", id),
        };
        let query = format!(
            "SELECT {COLUMNS} FROM feedback_requests
             WHERE {column} = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, FeedbackRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a request completed at `at`, whatever its current status.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<FeedbackRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE feedback_requests SET status = $2, completed_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedbackRequest>(&query)
            .bind(id)
            .bind(RequestStatus::Completed.as_str())
            .bind(at)
            .fetch_optional(pool)
            .await
    }

    /// Mark a request cancelled, whatever its current status.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<Option<FeedbackRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE feedback_requests SET status = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeedbackRequest>(&query)
            .bind(id)
            .bind(RequestStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }
}
