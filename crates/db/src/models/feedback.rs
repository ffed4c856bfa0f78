//! Feedback entity model and DTOs.

use feedback_core::error::CoreError;
use feedback_core::feedback::{AckState, Sentiment};
use feedback_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::UserResponse;

/// A row from the `feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub manager_id: DbId,
    pub employee_id: DbId,
    pub strengths: String,
    pub areas_to_improve: String,
    pub overall_sentiment: String,
    pub acknowledged: bool,
    pub acknowledged_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Feedback {
    pub fn sentiment(&self) -> Result<Sentiment, CoreError> {
        Sentiment::from_db(&self.overall_sentiment)
    }

    pub fn ack_state(&self) -> Result<AckState, CoreError> {
        AckState::from_row(self.acknowledged, self.acknowledged_at)
    }
}

/// Feedback joined with the manager who wrote it and the employee it is about.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackWithUsers {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub manager: UserResponse,
    pub employee: UserResponse,
}

/// DTO for creating feedback. The author is always the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeedback {
    pub employee_id: DbId,
    pub strengths: String,
    pub areas_to_improve: String,
    pub overall_sentiment: Sentiment,
}

/// DTO for editing feedback content. Relationship and acknowledgment
/// fields are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFeedback {
    pub strengths: Option<String>,
    pub areas_to_improve: Option<String>,
    pub overall_sentiment: Option<Sentiment>,
}
