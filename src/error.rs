//! Error taxonomy surfaced to callers of the store and the timer.
//!
//! Infrastructure code (SQLite, settings file) reports `anyhow::Error`; it is
//! folded into [`StudyError::Persistence`] at the repository boundary.

/// Local input problems. Nothing is persisted and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("select a subject first")]
    NoSubjectSelected,
    #[error("session duration must be greater than zero")]
    ZeroDuration,
    #[error("subject name must not be empty")]
    EmptySubjectName,
}

#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("A subject named '{0}' already exists")]
    DuplicateName(String),

    #[error("Subject not found: {0}")]
    UnknownSubject(String),

    /// The repository rejected or failed a create/delete/list call.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl StudyError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StudyError::Validation(_))
    }
}

impl From<anyhow::Error> for StudyError {
    fn from(err: anyhow::Error) -> Self {
        StudyError::Persistence(format!("{err:#}"))
    }
}

pub type StudyResult<T> = Result<T, StudyError>;
