//! Identity and org-relationship checks.
//!
//! Users form a forest of depth at most [`MAX_ORG_DEPTH`]: employees point
//! at a manager by id and managers may or may not point at one themselves.
//! Authorization only ever checks the "direct report" relationship; the
//! depth and cycle rules apply when a manager is assigned.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The facts about an authenticated caller that authorization rules need.
///
/// Built from the freshly loaded user row on every request, so role and
/// manager assignment always reflect current data rather than token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: DbId,
    pub role: Role,
    pub manager_id: Option<DbId>,
    pub is_active: bool,
}

impl Principal {
    /// Reject principals whose account has been deactivated.
    pub fn ensure_active(&self) -> Result<(), CoreError> {
        if self.is_active {
            Ok(())
        } else {
            Err(CoreError::AccountDisabled)
        }
    }

    /// Reject anyone who is not a manager.
    pub fn ensure_manager(&self, action: &str) -> Result<(), CoreError> {
        match self.role {
            Role::Manager => Ok(()),
            Role::Admin | Role::Employee => Err(CoreError::Forbidden(format!(
                "Only managers can {action}"
            ))),
        }
    }

    /// Reject anyone who is not an employee.
    pub fn ensure_employee(&self, action: &str) -> Result<(), CoreError> {
        match self.role {
            Role::Employee => Ok(()),
            Role::Admin | Role::Manager => Err(CoreError::Forbidden(format!(
                "Only employees can {action}"
            ))),
        }
    }

    /// Whether this principal has a team whose size appears on dashboards.
    pub fn has_team(&self) -> bool {
        match self.role {
            Role::Manager => true,
            Role::Admin | Role::Employee => false,
        }
    }
}

/// Whether a user with `report_manager_id` reports directly to `manager_id`.
pub fn is_direct_report(manager_id: DbId, report_manager_id: Option<DbId>) -> bool {
    report_manager_id == Some(manager_id)
}

/// Deepest level a user may sit at. Users without a manager are level 0.
pub const MAX_ORG_DEPTH: usize = 2;

/// The user proposed as someone's manager, with its place in the org.
#[derive(Debug, Clone, Copy)]
pub struct ManagerCandidate<'a> {
    pub id: DbId,
    pub role: Role,
    /// The candidate's manager, that manager's manager, and so on.
    pub ancestors: &'a [DbId],
}

/// Validate a requested manager assignment for `user_id`.
///
/// `user_id` is `None` for a user still being registered. `report_height`
/// is how many levels of reports hang below the user (0 when they manage
/// nobody). The caller resolves the candidate (and reports `NotFound`)
/// before calling this.
pub fn validate_manager_assignment(
    user_id: Option<DbId>,
    report_height: usize,
    candidate: ManagerCandidate<'_>,
) -> Result<(), CoreError> {
    let manager_id = candidate.id;
    if user_id == Some(manager_id) {
        return Err(CoreError::BadRequest(
            "A user cannot be their own manager".into(),
        ));
    }
    match candidate.role {
        Role::Manager => {}
        Role::Admin | Role::Employee => {
            return Err(CoreError::BadRequest(format!(
                "User {manager_id} is not a manager"
            )))
        }
    }
    if let Some(user_id) = user_id {
        if candidate.ancestors.contains(&user_id) {
            return Err(CoreError::BadRequest(format!(
                "User {manager_id} already reports to user {user_id}"
            )));
        }
    }
    if candidate.ancestors.len() + 1 + report_height > MAX_ORG_DEPTH {
        return Err(CoreError::BadRequest(format!(
            "Assigning manager {manager_id} would nest management more than {MAX_ORG_DEPTH} levels deep"
        )));
    }
    Ok(())
}
