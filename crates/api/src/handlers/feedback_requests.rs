//! Handlers for the `/feedback/requests` resource.
//!
//! An employee asks their current manager for feedback; the manager
//! completes the request, or either side cancels it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use feedback_core::error::CoreError;
use feedback_core::feedback_request::{
    authorize_cancel, authorize_complete, ensure_no_pending, resolve_request_target,
    validate_request_message, RequestScope, DUPLICATE_PENDING_MESSAGE, PENDING_REQUEST_CONSTRAINT,
};
use feedback_core::types::DbId;
use feedback_db::models::feedback_request::{
    CreateFeedbackRequest, FeedbackRequest, FeedbackRequestWithUsers,
};
use feedback_db::repositories::FeedbackRequestRepo;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::UserDirectory;
use crate::middleware::auth::CurrentUser;
use crate::response::{AppJson, DataResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

async fn find_request(pool: &sqlx::PgPool, request_id: DbId) -> AppResult<FeedbackRequest> {
    FeedbackRequestRepo::find_by_id(pool, request_id)
        .await?
        .ok_or_else(|| not_found(request_id))
}

fn not_found(request_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "FeedbackRequest",
        id: request_id,
    })
}

/// Log transitions out of a status that is already final. They are allowed.
fn warn_if_terminal(request: &FeedbackRequest, action: &str) -> AppResult<()> {
    let status = request.status()?;
    if status.is_terminal() {
        tracing::warn!(
            request_id = request.id,
            %status,
            action,
            "Transition applied to a request that is no longer pending"
        );
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// POST /api/v1/feedback/requests
///
/// Ask the caller's current manager for feedback. Returns 201.
pub async fn create_request(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(input): AppJson<CreateFeedbackRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FeedbackRequest>>)> {
    let manager_id = resolve_request_target(&current.principal)?;
    validate_request_message(input.message.as_deref())?;

    let employee_id = current.user.id;
    let pending = FeedbackRequestRepo::pending_exists(&state.pool, employee_id, manager_id).await?;
    ensure_no_pending(pending)?;

    // A concurrent create can still pass the check above; the partial
    // unique index rejects the second insert.
    let request = FeedbackRequestRepo::create(&state.pool, employee_id, manager_id, &input)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, PENDING_REQUEST_CONSTRAINT) {
                AppError::Core(CoreError::BadRequest(DUPLICATE_PENDING_MESSAGE.into()))
            } else {
                AppError::Database(e)
            }
        })?;

    tracing::info!(
        user_id = employee_id,
        request_id = request.id,
        manager_id,
        "Feedback request created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/feedback/requests
///
/// Managers see requests addressed to them; everyone else sees requests
/// they submitted. All statuses, newest first.
pub async fn list_requests(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<DataResponse<Vec<FeedbackRequestWithUsers>>>> {
    let scope = RequestScope::for_principal(&current.principal);
    let rows = FeedbackRequestRepo::list_for_scope(&state.pool, scope).await?;

    let users = UserDirectory::load(
        &state.pool,
        rows.iter().flat_map(|r| [r.employee_id, r.manager_id]),
    )
    .await?;

    let data = rows
        .into_iter()
        .map(|request| -> AppResult<FeedbackRequestWithUsers> {
            Ok(FeedbackRequestWithUsers {
                employee: users.get(request.employee_id)?,
                manager: users.get(request.manager_id)?,
                request,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/feedback/requests/{id}/complete
pub async fn complete_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<FeedbackRequest>>> {
    let existing = find_request(&state.pool, request_id).await?;
    authorize_complete(current.user.id, existing.manager_id)?;
    warn_if_terminal(&existing, "complete")?;

    let request = FeedbackRequestRepo::complete(&state.pool, request_id, Utc::now())
        .await?
        .ok_or_else(|| not_found(request_id))?;

    tracing::info!(user_id = current.user.id, request_id, "Feedback request completed");

    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/feedback/requests/{id}
///
/// Cancel a request. Either the requesting employee or the target manager
/// may cancel. The row is kept with status `cancelled`.
pub async fn cancel_request(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(request_id): Path<DbId>,
) -> AppResult<Json<DataResponse<FeedbackRequest>>> {
    let existing = find_request(&state.pool, request_id).await?;
    authorize_cancel(current.user.id, existing.employee_id, existing.manager_id)?;
    warn_if_terminal(&existing, "cancel")?;

    let request = FeedbackRequestRepo::cancel(&state.pool, request_id)
        .await?
        .ok_or_else(|| not_found(request_id))?;

    tracing::info!(user_id = current.user.id, request_id, "Feedback request cancelled");

    Ok(Json(DataResponse { data: request }))
}
