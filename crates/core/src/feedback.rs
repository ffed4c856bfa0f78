//! Feedback lifecycle rules.
//!
//! A feedback record is created by the employee's manager and can later be
//! acknowledged by the employee. Acknowledgment is one-way: nothing in this
//! module or the API ever clears it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::org::{is_direct_report, Principal};
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// Maximum length of the strengths / areas-to-improve texts.
pub const MAX_FEEDBACK_TEXT_LENGTH: usize = 10_000;

pub const SENTIMENT_POSITIVE: &str = "positive";
pub const SENTIMENT_NEUTRAL: &str = "neutral";
pub const SENTIMENT_NEGATIVE: &str = "negative";

/// All valid sentiment values.
pub const VALID_SENTIMENTS: &[&str] = &[SENTIMENT_POSITIVE, SENTIMENT_NEUTRAL, SENTIMENT_NEGATIVE];

/// The categorical tone a manager assigns to a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => SENTIMENT_POSITIVE,
            Sentiment::Neutral => SENTIMENT_NEUTRAL,
            Sentiment::Negative => SENTIMENT_NEGATIVE,
        }
    }

    /// Parse a sentiment stored in the database.
    pub fn from_db(value: &str) -> Result<Self, CoreError> {
        value.parse().map_err(|_| {
            CoreError::Internal(format!("Unknown sentiment '{value}' in feedback table"))
        })
    }
}

impl FromStr for Sentiment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SENTIMENT_POSITIVE => Ok(Sentiment::Positive),
            SENTIMENT_NEUTRAL => Ok(Sentiment::Neutral),
            SENTIMENT_NEGATIVE => Ok(Sentiment::Negative),
            other => Err(CoreError::Validation(format!(
                "Invalid sentiment '{other}'. Must be one of: {}",
                VALID_SENTIMENTS.join(", ")
            ))),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acknowledgment state of a feedback record.
///
/// Rows store this as an `acknowledged` flag plus a nullable timestamp; the
/// two must agree, and [`AckState::from_row`] refuses rows where they don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckState {
    Unacknowledged,
    Acknowledged { at: Timestamp },
}

impl AckState {
    pub fn from_row(acknowledged: bool, acknowledged_at: Option<Timestamp>) -> Result<Self, CoreError> {
        match (acknowledged, acknowledged_at) {
            (false, None) => Ok(AckState::Unacknowledged),
            (true, Some(at)) => Ok(AckState::Acknowledged { at }),
            (flag, at) => Err(CoreError::Internal(format!(
                "Inconsistent acknowledgment state: acknowledged={flag}, acknowledged_at={at:?}"
            ))),
        }
    }

    /// Transition to acknowledged at `now`.
    ///
    /// Acknowledging again re-stamps the timestamp.
    pub fn acknowledge(self, now: Timestamp) -> Self {
        AckState::Acknowledged { at: now }
    }

    pub fn is_acknowledged(self) -> bool {
        matches!(self, AckState::Acknowledged { .. })
    }

    pub fn acknowledged_at(self) -> Option<Timestamp> {
        match self {
            AckState::Unacknowledged => None,
            AckState::Acknowledged { at } => Some(at),
        }
    }
}

/// Which feedback records a caller can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackScope {
    /// Feedback the manager wrote.
    AuthoredBy(DbId),
    /// Feedback addressed to the user.
    ReceivedBy(DbId),
}

impl FeedbackScope {
    pub fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Manager => FeedbackScope::AuthoredBy(principal.id),
            Role::Employee | Role::Admin => FeedbackScope::ReceivedBy(principal.id),
        }
    }
}

/// Check that `caller` may write feedback about the employee.
///
/// `employee_manager_id` is the target's current manager assignment; the
/// caller of this function has already resolved the target (and reported
/// `NotFound` if it does not exist).
pub fn authorize_create(caller: &Principal, employee_manager_id: Option<DbId>) -> Result<(), CoreError> {
    caller.ensure_manager("create feedback")?;
    if !is_direct_report(caller.id, employee_manager_id) {
        return Err(CoreError::Forbidden(
            "You can only give feedback to your direct reports".into(),
        ));
    }
    Ok(())
}

/// Only the authoring manager may edit feedback content.
pub fn authorize_update(caller_id: DbId, feedback_manager_id: DbId) -> Result<(), CoreError> {
    if caller_id != feedback_manager_id {
        return Err(CoreError::Forbidden(
            "You can only update your own feedback".into(),
        ));
    }
    Ok(())
}

/// Only the subject employee may acknowledge feedback.
pub fn authorize_acknowledge(caller_id: DbId, feedback_employee_id: DbId) -> Result<(), CoreError> {
    if caller_id != feedback_employee_id {
        return Err(CoreError::Forbidden(
            "You can only acknowledge feedback given to you".into(),
        ));
    }
    Ok(())
}

/// Validate a strengths or areas-to-improve text.
pub fn validate_feedback_text(field: &str, text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if text.chars().count() > MAX_FEEDBACK_TEXT_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_FEEDBACK_TEXT_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn manager(id: DbId) -> Principal {
        Principal {
            id,
            role: Role::Manager,
            manager_id: None,
            is_active: true,
        }
    }

    fn employee(id: DbId, manager_id: Option<DbId>) -> Principal {
        Principal {
            id,
            role: Role::Employee,
            manager_id,
            is_active: true,
        }
    }

    #[test]
    fn manager_can_create_for_direct_report() {
        assert!(authorize_create(&manager(1), Some(1)).is_ok());
    }

    #[test]
    fn manager_cannot_create_for_someone_elses_report() {
        assert_matches!(
            authorize_create(&manager(1), Some(2)),
            Err(CoreError::Forbidden(msg)) if msg.contains("direct reports")
        );
        assert_matches!(authorize_create(&manager(1), None), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn non_managers_cannot_create() {
        assert_matches!(
            authorize_create(&employee(5, Some(1)), Some(5)),
            Err(CoreError::Forbidden(msg)) if msg == "Only managers can create feedback"
        );
    }

    #[test]
    fn only_author_can_update() {
        assert!(authorize_update(1, 1).is_ok());
        assert_matches!(authorize_update(2, 1), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn only_subject_can_acknowledge() {
        assert!(authorize_acknowledge(5, 5).is_ok());
        assert_matches!(authorize_acknowledge(1, 5), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(
            FeedbackScope::for_principal(&manager(1)),
            FeedbackScope::AuthoredBy(1)
        );
        assert_eq!(
            FeedbackScope::for_principal(&employee(5, Some(1))),
            FeedbackScope::ReceivedBy(5)
        );
        let admin = Principal {
            role: Role::Admin,
            ..manager(9)
        };
        assert_eq!(FeedbackScope::for_principal(&admin), FeedbackScope::ReceivedBy(9));
    }

    #[test]
    fn ack_state_requires_flag_and_timestamp_to_agree() {
        let now = Utc::now();
        assert_eq!(AckState::from_row(false, None).unwrap(), AckState::Unacknowledged);
        assert_eq!(
            AckState::from_row(true, Some(now)).unwrap(),
            AckState::Acknowledged { at: now }
        );
        assert_matches!(AckState::from_row(true, None), Err(CoreError::Internal(_)));
        assert_matches!(AckState::from_row(false, Some(now)), Err(CoreError::Internal(_)));
    }

    #[test]
    fn reacknowledging_moves_timestamp_forward() {
        let first = Utc::now();
        let later = first + Duration::seconds(5);
        let state = AckState::Unacknowledged.acknowledge(first);
        assert!(state.is_acknowledged());
        assert_eq!(state.acknowledged_at(), Some(first));

        let again = state.acknowledge(later);
        assert_eq!(again.acknowledged_at(), Some(later));
    }

    #[test]
    fn sentiment_round_trips_through_text() {
        for name in VALID_SENTIMENTS {
            assert_eq!(name.parse::<Sentiment>().unwrap().as_str(), *name);
        }
        assert_matches!("ecstatic".parse::<Sentiment>(), Err(CoreError::Validation(_)));
        assert_matches!(Sentiment::from_db("meh"), Err(CoreError::Internal(_)));
    }

    #[test]
    fn feedback_text_must_be_present() {
        assert!(validate_feedback_text("strengths", "Clear communicator").is_ok());
        assert_matches!(
            validate_feedback_text("strengths", "   "),
            Err(CoreError::Validation(msg)) if msg == "strengths must not be empty"
        );
        let long = "x".repeat(MAX_FEEDBACK_TEXT_LENGTH + 1);
        assert_matches!(
            validate_feedback_text("areas_to_improve", &long),
            Err(CoreError::Validation(_))
        );
    }
}
