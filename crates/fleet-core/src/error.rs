//! # Error Types
//!
//! Domain-specific error types for fleet-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fleet-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  fleet-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  fleet-engine errors                                                   │
//! │  └── EngineError      - What the service layer returns                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiResponse         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant classifies into one [`ErrorKind`], which is what callers
//! use to pick a response code.

use serde::Serialize;
use thiserror::Error;

use crate::types::StockSummary;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification shared by every error layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or out-of-range input, total mismatch, not enough stock.
    Validation,
    /// Item, fleet, boat or assignment absent.
    NotFound,
    /// Duplicate signature, edit collision, unchanged edit.
    Conflict,
    /// Store failure.
    Internal,
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the allocation and inventory rules.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Inventory item not found: {0}")]
    PoolItemNotFound(String),

    /// Listing the pool found nothing.
    #[error("No inventory items found")]
    PoolEmpty,

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(String),

    #[error("Fleet not found: {0}")]
    FleetNotFound(String),

    #[error("Boat not found: {0}")]
    BoatNotFound(String),

    /// The boat exists but is registered to another fleet.
    #[error("Boat {boat} does not belong to fleet {fleet}")]
    BoatNotInFleet { boat: String, fleet: String },

    /// Assign asked for more than the pool record holds.
    ///
    /// ## User Workflow
    /// ```text
    /// Assign 12 × "Gill Net" to Boat Y
    ///      │
    ///      ▼
    /// Pool holds 10
    ///      │
    ///      ▼
    /// InsufficientStock { requested: 12, available: 10 }
    ///      │
    ///      ▼
    /// "Requested quantity 12 exceeds available quantity 10"
    /// ```
    #[error("Requested quantity {requested} exceeds available quantity {available} for {name}")]
    InsufficientStock {
        name: String,
        requested: i64,
        available: i64,
    },

    /// A re-balance would drive the pool balance below zero.
    #[error("Insufficient inventory quantity: available {available}, required {required}")]
    InsufficientInventory { available: i64, required: i64 },

    /// Create matched an existing pool record's duplicate signature.
    #[error("An inventory item with the same name, note, unit and unit size already exists")]
    DuplicateStockLine(StockSummary),

    /// Edit would make the record collide with another pool record.
    #[error("Another inventory item already has the same name, unit price, unit size and unit")]
    ConflictingStockLine(StockSummary),

    /// Edit carried no changes.
    #[error("No changes detected for inventory item {0}")]
    NoChanges(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::PoolItemNotFound(_)
            | CoreError::PoolEmpty
            | CoreError::AssignmentNotFound(_)
            | CoreError::FleetNotFound(_)
            | CoreError::BoatNotFound(_)
            | CoreError::BoatNotInFleet { .. } => ErrorKind::NotFound,

            CoreError::InsufficientStock { .. }
            | CoreError::InsufficientInventory { .. }
            | CoreError::Validation(_) => ErrorKind::Validation,

            CoreError::DuplicateStockLine(_)
            | CoreError::ConflictingStockLine(_)
            | CoreError::NoChanges(_) => ErrorKind::Conflict,
        }
    }

    /// The colliding record, for conflict errors that carry one.
    pub fn conflicting_record(&self) -> Option<&StockSummary> {
        match self {
            CoreError::DuplicateStockLine(summary) | CoreError::ConflictingStockLine(summary) => {
                Some(summary)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the boundary validator before anything touches a ledger.
/// Every variant names the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field should be a string but is not.
    #[error("{field} must be a string")]
    NotAString { field: String },

    /// Field should be a number but is not.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// Field should be a whole number.
    #[error("{field} must be a whole number")]
    NotWhole { field: String },

    /// Value must be positive.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Numeric value above its ceiling.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    /// `unitSize` larger than the quantity it divides.
    #[error("unitSize ({unit_size}) must not exceed quantity ({quantity})")]
    UnitSizeExceedsQuantity { unit_size: i64, quantity: i64 },

    /// `selectUnit` left at the form placeholder.
    #[error("selectUnit must be a real unit, not the placeholder")]
    PlaceholderUnit,

    /// Client total disagrees with `round(unitPrice * quantity / unitSize, 2)`.
    #[error("total {provided} does not match expected total {expected}")]
    TotalMismatch { expected: String, provided: String },

    /// Invalid format (dates, payload shape).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// The field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::NotAString { field }
            | ValidationError::NotANumber { field }
            | ValidationError::NotWhole { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::UnitSizeExceedsQuantity { .. } => "unitSize",
            ValidationError::PlaceholderUnit => "selectUnit",
            ValidationError::TotalMismatch { .. } => "total",
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Gill Net".to_string(),
            requested: 12,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "Requested quantity 12 exceeds available quantity 10 for Gill Net"
        );

        let err = CoreError::InsufficientInventory {
            available: 2,
            required: 5,
        };
        assert!(err.to_string().starts_with("Insufficient inventory quantity"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::UnitSizeExceedsQuantity {
            unit_size: 12,
            quantity: 10,
        };
        assert_eq!(err.to_string(), "unitSize (12) must not exceed quantity (10)");
        assert_eq!(err.field(), "unitSize");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            CoreError::AssignmentNotFound("a".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::BoatNotInFleet {
                boat: "b".into(),
                fleet: "f".into()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(CoreError::NoChanges("x".into()).kind(), ErrorKind::Conflict);

        let validation_err = ValidationError::PlaceholderUnit;
        let core_err: CoreError = validation_err.into();
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_conflicting_record() {
        let summary = StockSummary {
            id: "p1".into(),
            name: "Hooks".into(),
            unit_price: 3.5,
            unit_size: 4,
            select_unit: "Box".into(),
        };
        let err = CoreError::DuplicateStockLine(summary.clone());
        assert_eq!(err.conflicting_record(), Some(&summary));
        assert!(CoreError::NoChanges("p1".into()).conflicting_record().is_none());
    }
}
