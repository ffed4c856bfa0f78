//! User profile validation.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::roles::Role;

/// Maximum length of a user's display name.
pub const MAX_FULL_NAME_LENGTH: usize = 200;

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid email address '{email}'")))
    }
}

/// Validate a display name.
pub fn validate_full_name(full_name: &str) -> Result<(), CoreError> {
    let trimmed = full_name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("full_name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "full_name exceeds maximum length of {MAX_FULL_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Roles that may be chosen at self-registration. Admin accounts are
/// provisioned out of band.
pub fn validate_registration_role(role: Role) -> Result<(), CoreError> {
    match role {
        Role::Manager | Role::Employee => Ok(()),
        Role::Admin => Err(CoreError::BadRequest(
            "Admin accounts cannot be self-registered".into(),
        )),
    }
}
