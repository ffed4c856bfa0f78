use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A precondition of the operation does not hold (e.g. no manager
    /// assigned, duplicate pending request).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No valid principal could be established for the request.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
