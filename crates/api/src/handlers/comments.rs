//! Handlers for comment threads on feedback records.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use feedback_core::comment::{authorize_thread_access, validate_comment};
use feedback_core::types::DbId;
use feedback_db::models::feedback_comment::{
    CreateFeedbackComment, FeedbackComment, FeedbackCommentWithAuthor,
};
use feedback_db::repositories::FeedbackCommentRepo;

use crate::error::AppResult;
use crate::handlers::feedback::find_feedback;
use crate::handlers::UserDirectory;
use crate::middleware::auth::CurrentUser;
use crate::response::{AppJson, DataResponse};
use crate::state::AppState;

/// GET /api/v1/feedback/{id}/comments
///
/// Oldest first, each joined with its author.
pub async fn list_comments(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(feedback_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FeedbackCommentWithAuthor>>>> {
    let feedback = find_feedback(&state.pool, feedback_id).await?;
    authorize_thread_access(current.user.id, feedback.manager_id, feedback.employee_id)?;

    let comments = FeedbackCommentRepo::list_for_feedback(&state.pool, feedback_id).await?;
    let authors = UserDirectory::load(&state.pool, comments.iter().map(|c| c.user_id)).await?;

    let data = comments
        .into_iter()
        .map(|comment| -> AppResult<FeedbackCommentWithAuthor> {
            Ok(FeedbackCommentWithAuthor {
                user: authors.get(comment.user_id)?,
                comment,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/feedback/{id}/comments
///
/// Returns 201 with the new comment.
pub async fn create_comment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(feedback_id): Path<DbId>,
    AppJson(input): AppJson<CreateFeedbackComment>,
) -> AppResult<(StatusCode, Json<DataResponse<FeedbackComment>>)> {
    let feedback = find_feedback(&state.pool, feedback_id).await?;
    authorize_thread_access(current.user.id, feedback.manager_id, feedback.employee_id)?;
    validate_comment(&input.comment)?;

    let comment =
        FeedbackCommentRepo::create(&state.pool, feedback_id, current.user.id, &input).await?;

    tracing::info!(
        user_id = current.user.id,
        feedback_id,
        comment_id = comment.id,
        "Comment added"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
