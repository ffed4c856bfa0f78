//! Request handlers, one submodule per resource.
//!
//! Handlers delegate rules to `feedback_core`, persistence to the
//! repositories in `feedback_db`, and map errors via [`AppError`].

pub mod auth;
pub mod comments;
pub mod feedback;
pub mod feedback_requests;
pub mod users;

use std::collections::HashMap;

use feedback_core::error::CoreError;
use feedback_core::org::{validate_manager_assignment, ManagerCandidate, MAX_ORG_DEPTH};
use feedback_core::types::DbId;
use feedback_db::models::user::{User, UserResponse};
use feedback_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};

/// Users referenced by a batch of rows, keyed by id.
pub(crate) struct UserDirectory(HashMap<DbId, UserResponse>);

impl UserDirectory {
    /// Load every user in `ids` with a single query.
    pub(crate) async fn load(
        pool: &sqlx::PgPool,
        ids: impl IntoIterator<Item = DbId>,
    ) -> AppResult<Self> {
        let mut ids: Vec<DbId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        let users = UserRepo::find_by_ids(pool, &ids).await?;
        Ok(Self(
            users
                .iter()
                .map(|u| (u.id, UserResponse::from(u)))
                .collect(),
        ))
    }

    /// Look up a user that a foreign key guarantees exists.
    pub(crate) fn get(&self, id: DbId) -> AppResult<UserResponse> {
        self.0.get(&id).cloned().ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Referenced user {id} missing from lookup"
            )))
        })
    }
}

/// Load a user by id or fail with `NotFound`.
pub(crate) async fn ensure_user_exists(
    pool: &sqlx::PgPool,
    user_id: DbId,
) -> AppResult<User> {
    UserRepo::find_by_id(pool, user_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })
    })
}

/// Check that `manager_id` may become the manager of `user_id`.
///
/// `user_id` is `None` during registration. Loads the candidate, walks
/// its management chain, and measures the user's own reporting depth
/// before handing the facts to [`validate_manager_assignment`].
pub(crate) async fn check_manager_assignment(
    pool: &sqlx::PgPool,
    user_id: Option<DbId>,
    manager_id: DbId,
) -> AppResult<()> {
    let manager = ensure_user_exists(pool, manager_id).await?;

    // Bounded walk: one step past the allowed depth is enough to reject.
    let mut ancestors = Vec::new();
    let mut next = manager.manager_id;
    while let Some(id) = next {
        if ancestors.len() > MAX_ORG_DEPTH || ancestors.contains(&id) {
            break;
        }
        ancestors.push(id);
        next = UserRepo::find_by_id(pool, id)
            .await?
            .and_then(|u| u.manager_id);
    }

    let report_height = match user_id {
        Some(id) => UserRepo::report_height(pool, id).await?.max(0) as usize,
        None => 0,
    };

    validate_manager_assignment(
        user_id,
        report_height,
        ManagerCandidate {
            id: manager.id,
            role: manager.role()?,
            ancestors: &ancestors,
        },
    )?;
    Ok(())
}
