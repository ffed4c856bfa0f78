//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use feedback_core::error::CoreError;
use feedback_core::roles::Role;
use feedback_core::users::{validate_email, validate_full_name};
use feedback_db::models::user::{UpdateUser, User, UserResponse, UserWithManager};
use feedback_db::repositories::UserRepo;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::auth::{EMAIL_CONSTRAINT, EMAIL_TAKEN_MESSAGE};
use crate::handlers::check_manager_assignment;
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{AppJson, DataResponse};
use crate::state::AppState;

/// Join a user with its manager's record.
async fn with_manager(pool: &sqlx::PgPool, user: &User) -> AppResult<UserWithManager> {
    let manager = match user.manager_id {
        Some(manager_id) => UserRepo::find_by_id(pool, manager_id)
            .await?
            .as_ref()
            .map(UserResponse::from),
        None => None,
    };
    Ok(UserWithManager {
        user: UserResponse::from(user),
        manager,
    })
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<DataResponse<UserWithManager>>> {
    let data = with_manager(&state.pool, &current.user).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/users/me
///
/// Partial update of the caller's own profile. An explicit `null`
/// `manager_id` clears the assignment.
pub async fn update_me(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(mut input): AppJson<UpdateUser>,
) -> AppResult<Json<DataResponse<UserWithManager>>> {
    let user_id = current.user.id;

    if let Some(email) = &input.email {
        validate_email(email)?;
        if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
            if existing.id != user_id {
                return Err(AppError::Core(CoreError::BadRequest(EMAIL_TAKEN_MESSAGE.into())));
            }
        }
    }

    if let Some(full_name) = input.full_name.take() {
        validate_full_name(&full_name)?;
        input.full_name = Some(full_name.trim().to_string());
    }

    if let Some(Some(manager_id)) = input.manager_id {
        check_manager_assignment(&state.pool, Some(user_id), manager_id).await?;
    }

    let updated = UserRepo::update(&state.pool, user_id, &input)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, EMAIL_CONSTRAINT) {
                AppError::Core(CoreError::BadRequest(EMAIL_TAKEN_MESSAGE.into()))
            } else {
                AppError::Database(e)
            }
        })?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    tracing::info!(user_id, "Profile updated");

    let data = with_manager(&state.pool, &updated).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/users/team
///
/// Direct reports of the calling manager.
pub async fn team(
    State(state): State<AppState>,
    RequireManager(current): RequireManager,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let members = UserRepo::list_team(&state.pool, current.user.id).await?;
    let data = members.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/users/managers
pub async fn managers(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let managers = UserRepo::list_by_role(&state.pool, Role::Manager).await?;
    let data = managers.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}
