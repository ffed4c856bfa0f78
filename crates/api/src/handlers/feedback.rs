//! Handlers for the `/feedback` resource.
//!
//! Managers write feedback about their direct reports; the subject
//! employee acknowledges it. Listing and the dashboard are scoped by the
//! caller's role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use feedback_core::dashboard::DashboardStats;
use feedback_core::error::CoreError;
use feedback_core::feedback::{
    authorize_acknowledge, authorize_create, authorize_update, validate_feedback_text,
    FeedbackScope,
};
use feedback_core::types::DbId;
use feedback_db::models::feedback::{CreateFeedback, Feedback, FeedbackWithUsers, UpdateFeedback};
use feedback_db::repositories::{FeedbackRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::{ensure_user_exists, UserDirectory};
use crate::middleware::auth::CurrentUser;
use crate::response::{AppJson, DataResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Load a feedback record or fail with `NotFound`.
pub(crate) async fn find_feedback(pool: &sqlx::PgPool, feedback_id: DbId) -> AppResult<Feedback> {
    FeedbackRepo::find_by_id(pool, feedback_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Feedback",
                id: feedback_id,
            })
        })
}

/// Attach manager and employee records to each feedback row, preserving order.
async fn join_users(
    pool: &sqlx::PgPool,
    rows: Vec<Feedback>,
) -> AppResult<Vec<FeedbackWithUsers>> {
    let users = UserDirectory::load(
        pool,
        rows.iter().flat_map(|f| [f.manager_id, f.employee_id]),
    )
    .await?;

    rows.into_iter()
        .map(|feedback| -> AppResult<FeedbackWithUsers> {
            Ok(FeedbackWithUsers {
                manager: users.get(feedback.manager_id)?,
                employee: users.get(feedback.employee_id)?,
                feedback,
            })
        })
        .collect()
}

/// Dashboard payload: aggregate counts plus the feedback they were computed from.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub feedback: Vec<FeedbackWithUsers>,
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// POST /api/v1/feedback
///
/// Write feedback about one of the caller's direct reports. Returns 201.
pub async fn create_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(input): AppJson<CreateFeedback>,
) -> AppResult<(StatusCode, Json<DataResponse<Feedback>>)> {
    // Role before lookup: non-managers get 403 even for unknown employee ids.
    current.principal.ensure_manager("create feedback")?;

    let employee = ensure_user_exists(&state.pool, input.employee_id).await?;
    authorize_create(&current.principal, employee.manager_id)?;

    validate_feedback_text("strengths", &input.strengths)?;
    validate_feedback_text("areas_to_improve", &input.areas_to_improve)?;

    let feedback = FeedbackRepo::create(&state.pool, current.user.id, &input).await?;

    tracing::info!(
        user_id = current.user.id,
        feedback_id = feedback.id,
        employee_id = feedback.employee_id,
        sentiment = %feedback.overall_sentiment,
        "Feedback created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: feedback })))
}

/// GET /api/v1/feedback
///
/// Managers see feedback they wrote; everyone else sees feedback they
/// received. Newest first.
pub async fn list_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<DataResponse<Vec<FeedbackWithUsers>>>> {
    let scope = FeedbackScope::for_principal(&current.principal);
    let rows = FeedbackRepo::list_for_scope(&state.pool, scope).await?;
    let data = join_users(&state.pool, rows).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/feedback/dashboard
///
/// Sentiment counts over the caller's visible feedback, plus team size for
/// managers.
pub async fn dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let scope = FeedbackScope::for_principal(&current.principal);
    let rows = FeedbackRepo::list_for_scope(&state.pool, scope).await?;

    let team_members_count = if current.principal.has_team() {
        UserRepo::count_team(&state.pool, current.user.id).await?
    } else {
        0
    };

    let sentiments = rows
        .iter()
        .map(Feedback::sentiment)
        .collect::<Result<Vec<_>, _>>()?;
    let stats = DashboardStats::compute(sentiments, team_members_count);

    let feedback = join_users(&state.pool, rows).await?;
    Ok(Json(DataResponse {
        data: DashboardResponse { stats, feedback },
    }))
}

/// PUT /api/v1/feedback/{id}
///
/// Edit the content of feedback the caller wrote.
pub async fn update_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(feedback_id): Path<DbId>,
    AppJson(input): AppJson<UpdateFeedback>,
) -> AppResult<Json<DataResponse<Feedback>>> {
    let existing = find_feedback(&state.pool, feedback_id).await?;
    authorize_update(current.user.id, existing.manager_id)?;

    if let Some(strengths) = &input.strengths {
        validate_feedback_text("strengths", strengths)?;
    }
    if let Some(areas) = &input.areas_to_improve {
        validate_feedback_text("areas_to_improve", areas)?;
    }

    let feedback = FeedbackRepo::update(&state.pool, feedback_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id: feedback_id,
        }))?;

    tracing::info!(user_id = current.user.id, feedback_id, "Feedback updated");

    Ok(Json(DataResponse { data: feedback }))
}

/// POST /api/v1/feedback/{id}/acknowledge
///
/// Mark feedback as read by its subject. Acknowledging again moves the
/// timestamp forward.
pub async fn acknowledge_feedback(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(feedback_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Feedback>>> {
    let existing = find_feedback(&state.pool, feedback_id).await?;
    authorize_acknowledge(current.user.id, existing.employee_id)?;

    let previous = existing.ack_state()?;
    let next = previous.acknowledge(Utc::now());
    let at = next
        .acknowledged_at()
        .ok_or_else(|| AppError::InternalError("Acknowledged state without timestamp".into()))?;

    let feedback = FeedbackRepo::acknowledge(&state.pool, feedback_id, at)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id: feedback_id,
        }))?;

    tracing::info!(
        user_id = current.user.id,
        feedback_id,
        reacknowledged = previous.is_acknowledged(),
        "Feedback acknowledged"
    );

    Ok(Json(DataResponse { data: feedback }))
}
