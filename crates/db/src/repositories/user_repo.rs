//! Repository for the `users` table.

use feedback_core::roles::Role;
use feedback_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, full_name, password_hash, role, manager_id, \
                        is_active, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, full_name, password_hash, role, manager_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(input.manager_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every user whose id is in `ids`. Order is unspecified.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<User>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List the direct reports of a manager, ordered by name.
    pub async fn list_team(pool: &PgPool, manager_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE manager_id = $1 ORDER BY full_name, id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(manager_id)
            .fetch_all(pool)
            .await
    }

    /// Count the direct reports of a manager.
    pub async fn count_team(pool: &PgPool, manager_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE manager_id = $1")
            .bind(manager_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// How many levels of reports sit below `manager_id`: 0 for nobody,
    /// 1 for direct reports only, 2 when a report has reports of their own.
    pub async fn report_height(pool: &PgPool, manager_id: DbId) -> Result<i32, sqlx::Error> {
        let (height,): (i32,) = sqlx::query_as(
            "SELECT CASE
                WHEN EXISTS (
                    SELECT 1 FROM users r JOIN users rr ON rr.manager_id = r.id
                    WHERE r.manager_id = $1
                ) THEN 2
                WHEN EXISTS (SELECT 1 FROM users WHERE manager_id = $1) THEN 1
                ELSE 0
             END::INT",
        )
        .bind(manager_id)
        .fetch_one(pool)
        .await?;
        Ok(height)
    }

    /// List all users holding `role`, ordered by name.
    pub async fn list_by_role(pool: &PgPool, role: Role) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE role = $1 ORDER BY full_name, id");
        sqlx::query_as::<_, User>(&query)
            .bind(role.as_str())
            .fetch_all(pool)
            .await
    }

    /// Update a user's profile. Only fields present in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                manager_id = CASE WHEN $4 THEN $5 ELSE manager_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(input.manager_id.is_some())
            .bind(input.manager_id.flatten())
            .fetch_optional(pool)
            .await
    }
}
