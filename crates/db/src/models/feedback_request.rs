//! Feedback request entity model and DTOs.

use feedback_core::error::CoreError;
use feedback_core::feedback_request::RequestStatus;
use feedback_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserResponse;

/// A row from the `feedback_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackRequest {
    pub id: DbId,
    pub employee_id: DbId,
    pub manager_id: DbId,
    pub message: Option<String>,
    pub status: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FeedbackRequest {
    pub fn status(&self) -> Result<RequestStatus, CoreError> {
        RequestStatus::from_db(&self.status)
    }
}

/// A request joined with the employee who sent it and the manager it targets.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequestWithUsers {
    #[serde(flatten)]
    pub request: FeedbackRequest,
    pub employee: UserResponse,
    pub manager: UserResponse,
}

/// DTO for opening a request. Employee and manager come from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFeedbackRequest {
    pub message: Option<String>,
}
