//! Comments on feedback records.
//!
//! Either party of a feedback record (its manager or its employee) may
//! comment on it and read its comments.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a comment.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// Only the manager or employee of a feedback record may access its thread.
pub fn authorize_thread_access(
    caller_id: DbId,
    feedback_manager_id: DbId,
    feedback_employee_id: DbId,
) -> Result<(), CoreError> {
    if caller_id != feedback_manager_id && caller_id != feedback_employee_id {
        return Err(CoreError::Forbidden(
            "You can only comment on feedback you gave or received".into(),
        ));
    }
    Ok(())
}

/// Validate comment text.
pub fn validate_comment(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("comment must not be empty".into()));
    }
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn both_parties_have_access() {
        assert!(authorize_thread_access(1, 1, 5).is_ok());
        assert!(authorize_thread_access(5, 1, 5).is_ok());
    }

    #[test]
    fn outsiders_are_forbidden() {
        assert_matches!(authorize_thread_access(9, 1, 5), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn comment_text_rules() {
        assert!(validate_comment("Thanks, agreed.").is_ok());
        assert_matches!(validate_comment(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_comment("\n\t "), Err(CoreError::Validation(_)));
        let long = "c".repeat(MAX_COMMENT_LENGTH + 1);
        assert_matches!(validate_comment(&long), Err(CoreError::Validation(_)));
        let exact = "c".repeat(MAX_COMMENT_LENGTH);
        assert!(validate_comment(&exact).is_ok());
    }
}
