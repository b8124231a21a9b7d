use crate::validation::FieldIssue;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    /// A required identifier was not supplied (e.g. `DELETE` without `?id=`).
    #[error("{0}")]
    Required(&'static str),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// A natural-key value is already taken. Carries the user-facing message.
    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
