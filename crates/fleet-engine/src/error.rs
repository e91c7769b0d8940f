//! # Engine Error Type
//!
//! What every service call returns on failure.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                     │
//! │                                  ├──► EngineError ──► ApiResponse      │
//! │  sqlx::Error ──► DbError ────────┘        │                            │
//! │                                           └── kind() → ErrorKind       │
//! │                                                                         │
//! │  CoreError        → its own kind                                       │
//! │  DbError::NotFound → NotFound                                          │
//! │  anything else    → Internal (logged, detail hidden in production)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fleet_core::{CoreError, ErrorKind, ValidationError};
use fleet_db::DbError;
use thiserror::Error;

/// Service-layer error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business rule or validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure.
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    /// Anything else that should never reach a user verbatim.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(err) => err.kind(),
            EngineError::Store(DbError::NotFound { .. }) => ErrorKind::NotFound,
            EngineError::Store(_) | EngineError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The core error, when this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            EngineError::Core(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err: EngineError = ValidationError::PlaceholderUnit.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: EngineError = DbError::not_found("Assignment", "a1").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: EngineError = DbError::PoolExhausted.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_core_message_is_transparent() {
        let err: EngineError = CoreError::AssignmentNotFound("a1".into()).into();
        assert_eq!(err.to_string(), "Assignment not found: a1");
        assert!(err.as_core().is_some());
    }
}
