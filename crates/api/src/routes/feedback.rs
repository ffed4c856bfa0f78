//! Route definitions for the `/feedback` resource, including requests and
//! comment threads.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{comments, feedback, feedback_requests};
use crate::state::AppState;

/// Routes mounted at `/feedback`.
///
/// ```text
/// GET    /                         -> list_feedback
/// POST   /                         -> create_feedback
/// GET    /dashboard                -> dashboard
/// PUT    /{id}                     -> update_feedback
/// POST   /{id}/acknowledge         -> acknowledge_feedback
/// GET    /{id}/comments            -> list_comments
/// POST   /{id}/comments            -> create_comment
///
/// GET    /requests                 -> list_requests
/// POST   /requests                 -> create_request
/// DELETE /requests/{id}            -> cancel_request
/// POST   /requests/{id}/complete   -> complete_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route("/dashboard", get(feedback::dashboard))
        .route("/{id}", put(feedback::update_feedback))
        .route("/{id}/acknowledge", post(feedback::acknowledge_feedback))
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/requests",
            get(feedback_requests::list_requests).post(feedback_requests::create_request),
        )
        .route("/requests/{id}", delete(feedback_requests::cancel_request))
        .route(
            "/requests/{id}/complete",
            post(feedback_requests::complete_request),
        )
}
