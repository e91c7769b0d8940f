//! # Response Envelope
//!
//! Every service result leaves the engine as an [`ApiResponse`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ok(value)                                                              │
//! │    { "success": true,  "message": "Item assigned", "data": {...} }      │
//! │                                                                         │
//! │  Err(Validation)                                                        │
//! │    { "success": false, "code": "VALIDATION_ERROR",                      │
//! │      "message": "Validation failed", "error": "unitSize (12) must ..." }│
//! │                                                                         │
//! │  Err(NotFound)                                                          │
//! │    { "success": false, "code": "NOT_FOUND",                             │
//! │      "message": "Boat not found: Sea Wolf" }                            │
//! │                                                                         │
//! │  Err(Conflict)                                                          │
//! │    { "success": false, "code": "CONFLICT",                              │
//! │      "message": "...", "existingItem": { id, name, unitPrice, ... } }   │
//! │                                                                         │
//! │  Err(Internal)                                                          │
//! │    { "success": false, "code": "INTERNAL_ERROR",                        │
//! │      "message": "Internal server error",                               │
//! │      "error": <detail only when expose_error_detail> }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::error;

use fleet_core::{ErrorKind, StockSummary};

use crate::error::{EngineError, EngineResult};

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Duplicate or colliding record, or unchanged edit (409)
    Conflict,

    /// Store failure (500)
    InternalError,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::Internal => ErrorCode::InternalError,
        }
    }
}

/// Uniform `{success, message, error, data}` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    /// The colliding row, for conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_item: Option<StockSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Success with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            error: None,
            code: None,
            existing_item: None,
            data: Some(data),
        }
    }

    /// Success without a payload.
    pub fn done(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            error: None,
            code: None,
            existing_item: None,
            data: None,
        }
    }

    /// Failure carrying the data it managed to produce.
    pub fn partial(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: false,
            ..ApiResponse::ok(message, data)
        }
    }

    /// Failure from a service error.
    ///
    /// Internal errors are logged here; their detail is attached only when
    /// `expose_detail` is set.
    pub fn failure(err: &EngineError, expose_detail: bool) -> Self {
        let kind = err.kind();

        let (message, detail) = match kind {
            ErrorKind::Validation => ("Validation failed".to_string(), Some(err.to_string())),
            ErrorKind::NotFound | ErrorKind::Conflict => (err.to_string(), None),
            ErrorKind::Internal => {
                error!(error = %err, "Internal error");
                (
                    "Internal server error".to_string(),
                    expose_detail.then(|| err.to_string()),
                )
            }
        };

        ApiResponse {
            success: false,
            message,
            error: detail,
            code: Some(kind.into()),
            existing_item: err
                .as_core()
                .and_then(|core| core.conflicting_record())
                .cloned(),
            data: None,
        }
    }

    /// Builds the envelope for a service result.
    ///
    /// `render` turns the success value into a message and optional payload.
    pub fn from_result<U, F>(result: EngineResult<U>, expose_detail: bool, render: F) -> Self
    where
        F: FnOnce(U) -> (String, Option<T>),
    {
        match result {
            Ok(value) => {
                let (message, data) = render(value);
                ApiResponse {
                    data,
                    ..ApiResponse::done(message)
                }
            }
            Err(err) => ApiResponse::failure(&err, expose_detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::{CoreError, ValidationError};
    use fleet_db::DbError;
    use serde_json::json;

    #[test]
    fn test_ok_shape() {
        let response = ApiResponse::ok("Item assigned", json!({ "id": "a1" }));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Item assigned");
        assert_eq!(value["data"]["id"], "a1");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_validation_failure() {
        let err: EngineError = ValidationError::UnitSizeExceedsQuantity {
            unit_size: 12,
            quantity: 10,
        }
        .into();
        let response: ApiResponse<()> = ApiResponse::failure(&err, false);

        assert!(!response.success);
        assert_eq!(response.code, Some(ErrorCode::ValidationError));
        assert_eq!(response.message, "Validation failed");
        assert!(response.error.unwrap().contains("unitSize"));
    }

    #[test]
    fn test_conflict_carries_summary() {
        let summary = StockSummary {
            id: "p1".into(),
            name: "Hooks".into(),
            unit_price: 3.5,
            unit_size: 4,
            select_unit: "Box".into(),
        };
        let err: EngineError = CoreError::DuplicateStockLine(summary.clone()).into();
        let response: ApiResponse<()> = ApiResponse::failure(&err, false);

        assert_eq!(response.code, Some(ErrorCode::Conflict));
        assert_eq!(response.existing_item, Some(summary));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["code"], "CONFLICT");
        assert_eq!(value["existingItem"]["selectUnit"], "Box");
    }

    #[test]
    fn test_internal_detail_exposure() {
        let err: EngineError = DbError::QueryFailed("disk I/O error".into()).into();

        let hidden: ApiResponse<()> = ApiResponse::failure(&err, false);
        assert_eq!(hidden.code, Some(ErrorCode::InternalError));
        assert_eq!(hidden.message, "Internal server error");
        assert!(hidden.error.is_none());

        let shown: ApiResponse<()> = ApiResponse::failure(&err, true);
        assert!(shown.error.unwrap().contains("disk I/O error"));
    }

    #[test]
    fn test_from_result() {
        let ok: EngineResult<i64> = Ok(5);
        let response = ApiResponse::from_result(ok, false, |n| (format!("{} rows", n), Some(n)));
        assert!(response.success);
        assert_eq!(response.data, Some(5));

        let err: EngineResult<i64> = Err(CoreError::AssignmentNotFound("a9".into()).into());
        let response: ApiResponse<i64> =
            ApiResponse::from_result(err, false, |n| (String::new(), Some(n)));
        assert_eq!(response.code, Some(ErrorCode::NotFound));
        assert_eq!(response.message, "Assignment not found: a9");
    }
}
