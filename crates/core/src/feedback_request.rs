//! Feedback-request lifecycle rules.
//!
//! ```text
//!            complete (target manager)
//! pending ─────────────────────────────▶ completed
//!    │
//!    └──────────────────────────────────▶ cancelled
//!            cancel (employee or manager)
//! ```
//!
//! Neither `complete` nor `cancel` inspects the current status, so a
//! cancelled request can still be completed and vice versa.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::org::Principal;
use crate::roles::Role;
use crate::types::DbId;

/// Maximum length of the optional message attached to a request.
pub const MAX_REQUEST_MESSAGE_LENGTH: usize = 2_000;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid request status values.
pub const VALID_REQUEST_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_COMPLETED, STATUS_CANCELLED];

/// Name of the partial unique index that allows a single pending request
/// per (employee, manager) pair.
pub const PENDING_REQUEST_CONSTRAINT: &str = "uq_feedback_requests_pending";

/// Message returned when a pending request already exists.
pub const DUPLICATE_PENDING_MESSAGE: &str = "You already have a pending feedback request";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => STATUS_PENDING,
            RequestStatus::Completed => STATUS_COMPLETED,
            RequestStatus::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Parse a status stored in the database.
    pub fn from_db(value: &str) -> Result<Self, CoreError> {
        value.parse().map_err(|_| {
            CoreError::Internal(format!("Unknown status '{value}' in feedback_requests table"))
        })
    }

    pub fn is_terminal(self) -> bool {
        match self {
            RequestStatus::Pending => false,
            RequestStatus::Completed | RequestStatus::Cancelled => true,
        }
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(RequestStatus::Pending),
            STATUS_COMPLETED => Ok(RequestStatus::Completed),
            STATUS_CANCELLED => Ok(RequestStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid request status '{other}'. Must be one of: {}",
                VALID_REQUEST_STATUSES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which requests a caller can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    /// Requests addressed to the manager.
    TargetedAt(DbId),
    /// Requests the user submitted.
    SubmittedBy(DbId),
}

impl RequestScope {
    pub fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Manager => RequestScope::TargetedAt(principal.id),
            Role::Employee | Role::Admin => RequestScope::SubmittedBy(principal.id),
        }
    }
}

/// Check that `caller` may open a new request and return the manager it
/// will be addressed to: the caller's manager at call time.
pub fn resolve_request_target(caller: &Principal) -> Result<DbId, CoreError> {
    caller.ensure_employee("request feedback")?;
    caller
        .manager_id
        .ok_or_else(|| CoreError::BadRequest("You don't have a manager assigned".into()))
}

/// Reject a new request while one is still pending for the same pair.
pub fn ensure_no_pending(pending_exists: bool) -> Result<(), CoreError> {
    if pending_exists {
        return Err(CoreError::BadRequest(DUPLICATE_PENDING_MESSAGE.into()));
    }
    Ok(())
}

/// Only the manager a request is addressed to may complete it.
pub fn authorize_complete(caller_id: DbId, request_manager_id: DbId) -> Result<(), CoreError> {
    if caller_id != request_manager_id {
        return Err(CoreError::Forbidden(
            "You can only complete requests assigned to you".into(),
        ));
    }
    Ok(())
}

/// Either party of a request may cancel it.
pub fn authorize_cancel(
    caller_id: DbId,
    request_employee_id: DbId,
    request_manager_id: DbId,
) -> Result<(), CoreError> {
    if caller_id != request_employee_id && caller_id != request_manager_id {
        return Err(CoreError::Forbidden(
            "You can only cancel your own requests or requests assigned to you".into(),
        ));
    }
    Ok(())
}

/// Validate the optional message attached to a request.
pub fn validate_request_message(message: Option<&str>) -> Result<(), CoreError> {
    match message {
        Some(text) if text.chars().count() > MAX_REQUEST_MESSAGE_LENGTH => {
            Err(CoreError::Validation(format!(
                "message exceeds maximum length of {MAX_REQUEST_MESSAGE_LENGTH} characters"
            )))
        }
        _ => Ok(()),
    }
}
