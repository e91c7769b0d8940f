//! # Validation Module
//!
//! The boundary validator: turns loosely typed request payloads into
//! validated input structs before any ledger is touched.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Transport (out of scope)                                     │
//! │  └── JSON body → PoolItemRequest / AssignRequest / ModifyRequest       │
//! │           │        (every field is an Option<serde_json::Value>)        │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── presence, type, length and range per field                        │
//! │  ├── unitSize ≤ quantity, selectUnit ≠ placeholder                     │
//! │  └── total == round(unitPrice × quantity / unitSize, 2)                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Services (fleet-engine)                                      │
//! │  └── existence, ownership, stock levels, signatures                    │
//! │                                                                         │
//! │  The first failing field wins and is named in the error.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric fields accept JSON numbers or numeric strings; strings are
//! trimmed before they are measured.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_QUANTITY, MAX_UNIT_PRICE_CENTS, UNIT_PLACEHOLDER};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Payloads
// =============================================================================

/// Create/edit payload for a pool item, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolItemRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub note: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub unit_price: Option<Value>,
    #[serde(default)]
    pub select_unit: Option<Value>,
    #[serde(default)]
    pub unit_size: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub date_created: Option<Value>,
}

/// Assign payload, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// Pool item id.
    #[serde(default)]
    pub item_id: Option<Value>,
    /// Destination fleet name.
    #[serde(default)]
    pub fleet: Option<Value>,
    /// Destination boat name.
    #[serde(default)]
    pub boat: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default)]
    pub note: Option<Value>,
    /// Effective date; defaults to now.
    #[serde(default)]
    pub date: Option<Value>,
}

/// Re-balance payload, as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest {
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub fleet: Option<Value>,
    #[serde(default)]
    pub boat: Option<Value>,
}

// =============================================================================
// Validated Inputs
// =============================================================================

/// A fully validated pool item, ready for create or edit.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolItemDraft {
    pub name: String,
    pub note: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub select_unit: String,
    pub unit_size: i64,
    pub total: Money,
    pub date_created: DateTime<Utc>,
}

/// Destination given by names, resolved later against the fleet directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationNames {
    pub fleet: String,
    pub boat: String,
}

/// A validated assign request.
///
/// The total is only shape-checked here; it is compared with the pool
/// item's price once the item is loaded (see [`validate_total`]).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignOrder {
    pub item_id: String,
    pub destination: DestinationNames,
    pub quantity: i64,
    pub total: Money,
    /// `None` keeps the pool item's note.
    pub note: Option<String>,
    pub effective_date: DateTime<Utc>,
}

/// A validated re-balance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyOrder {
    /// Zero releases the assignment back to the pool.
    pub quantity: i64,
    /// `None` keeps the current destination.
    pub destination: Option<DestinationNames>,
}

/// One entry of a bulk archive update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveUpdate {
    pub id: String,
    pub archived: bool,
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a pool item create/edit payload.
///
/// ## Rules
/// ```text
/// name         non-empty string, ≤ 40 chars
/// note         non-empty string, ≤ 120 chars
/// quantity     whole number, 0 < q ≤ 10,000
/// unitPrice    number, 0 < p ≤ 1,000,000
/// selectUnit   non-empty string, not "Unit"
/// unitSize     whole number, 0 < unitSize ≤ quantity
/// total        number, > 0, == round(unitPrice × quantity / unitSize, 2)
/// dateCreated  RFC 3339 timestamp or YYYY-MM-DD
/// ```
pub fn validate_pool_item(req: &PoolItemRequest) -> ValidationResult<PoolItemDraft> {
    let name = required_string("name", &req.name, MAX_NAME_LEN)?;
    let note = required_string("note", &req.note, MAX_NOTE_LEN)?;
    let quantity = validate_quantity("quantity", &req.quantity)?;
    let unit_price = validate_unit_price(&req.unit_price)?;
    let select_unit = validate_select_unit(&req.select_unit)?;

    let unit_size = whole_number("unitSize", &req.unit_size)?;
    if unit_size <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unitSize".to_string(),
        });
    }
    if unit_size > quantity {
        return Err(ValidationError::UnitSizeExceedsQuantity {
            unit_size,
            quantity,
        });
    }

    let total = money("total", &req.total)?;
    validate_total(unit_price.line_total(quantity, unit_size), total)?;

    let date_created = calendar_date("dateCreated", &req.date_created)?;

    Ok(PoolItemDraft {
        name,
        note,
        quantity,
        unit_price,
        select_unit,
        unit_size,
        total,
        date_created,
    })
}

/// Validates an assign payload.
///
/// Quantity zero is rejected here, before any ledger is read.
pub fn validate_assign(req: &AssignRequest) -> ValidationResult<AssignOrder> {
    let item_id = required_string("itemId", &req.item_id, usize::MAX)?;
    let fleet = required_string("fleet", &req.fleet, MAX_NAME_LEN)?;
    let boat = required_string("boat", &req.boat, MAX_NAME_LEN)?;
    let quantity = validate_quantity("quantity", &req.quantity)?;

    let total = money("total", &req.total)?;
    if !total.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "total".to_string(),
        });
    }

    let note = optional_string("note", &req.note, MAX_NOTE_LEN)?;

    let effective_date = match &req.date {
        None => Utc::now(),
        Some(_) => calendar_date("date", &req.date)?,
    };

    Ok(AssignOrder {
        item_id,
        destination: DestinationNames { fleet, boat },
        quantity,
        total,
        note,
        effective_date,
    })
}

/// Validates a re-balance payload.
///
/// ## Rules
/// - quantity: present, numeric, whole, ≥ 0 (0 means release); no upper
///   bound here, increases are bounded by the pool balance
/// - fleet and boat: both or neither
pub fn validate_modify(req: &ModifyRequest) -> ValidationResult<ModifyOrder> {
    let quantity = whole_number("quantity", &req.quantity)?;
    if quantity < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    let fleet = optional_string("fleet", &req.fleet, MAX_NAME_LEN)?;
    let boat = optional_string("boat", &req.boat, MAX_NAME_LEN)?;

    let destination = match (fleet, boat) {
        (Some(fleet), Some(boat)) => Some(DestinationNames { fleet, boat }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ValidationError::Required {
                field: "boat".to_string(),
            })
        }
        (None, Some(_)) => {
            return Err(ValidationError::Required {
                field: "fleet".to_string(),
            })
        }
    };

    Ok(ModifyOrder {
        quantity,
        destination,
    })
}

/// Validates a bulk archive payload: a JSON array of `{id, archived}`.
pub fn parse_archive_updates(payload: &Value) -> ValidationResult<Vec<ArchiveUpdate>> {
    let entries = payload
        .as_array()
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "updates".to_string(),
            reason: "must be an array".to_string(),
        })?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ValidationError::Required {
                    field: format!("updates[{}].id", idx),
                })?;
            let archived = entry
                .get("archived")
                .and_then(Value::as_bool)
                .ok_or_else(|| ValidationError::InvalidFormat {
                    field: format!("updates[{}].archived", idx),
                    reason: "must be a boolean".to_string(),
                })?;
            Ok(ArchiveUpdate {
                id: id.to_string(),
                archived,
            })
        })
        .collect()
}

/// Compares a client-supplied total with the expected line total.
///
/// ## Example
/// ```rust
/// use fleet_core::money::Money;
/// use fleet_core::validation::validate_total;
///
/// let expected = Money::from_cents(1000).line_total(2, 3); // 6.67
/// assert!(validate_total(expected, Money::from_cents(667)).is_ok());
/// assert!(validate_total(expected, Money::from_cents(666)).is_err());
/// ```
pub fn validate_total(expected: Money, provided: Money) -> ValidationResult<()> {
    if !provided.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "total".to_string(),
        });
    }

    if provided != expected {
        return Err(ValidationError::TotalMismatch {
            expected: expected.to_string(),
            provided: provided.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

fn validate_quantity(field: &str, value: &Option<Value>) -> ValidationResult<i64> {
    let qty = whole_number(field, value)?;

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_QUANTITY {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_QUANTITY.to_string(),
        });
    }

    Ok(qty)
}

fn validate_unit_price(value: &Option<Value>) -> ValidationResult<Money> {
    let price = money("unitPrice", value)?;

    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unitPrice".to_string(),
        });
    }

    if price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::TooLarge {
            field: "unitPrice".to_string(),
            max: Money::from_cents(MAX_UNIT_PRICE_CENTS).to_string(),
        });
    }

    Ok(price)
}

fn validate_select_unit(value: &Option<Value>) -> ValidationResult<String> {
    let unit = required_string("selectUnit", value, MAX_NAME_LEN)?;

    if unit == UNIT_PLACEHOLDER {
        return Err(ValidationError::PlaceholderUnit);
    }

    Ok(unit)
}

fn required_string(field: &str, value: &Option<Value>, max: usize) -> ValidationResult<String> {
    match value {
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                });
            }
            if s.chars().count() > max {
                return Err(ValidationError::TooLong {
                    field: field.to_string(),
                    max,
                });
            }
            Ok(s.to_string())
        }
        Some(_) => Err(ValidationError::NotAString {
            field: field.to_string(),
        }),
    }
}

/// Like [`required_string`], but absent or blank is `None`.
fn optional_string(
    field: &str,
    value: &Option<Value>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value {
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        None => Ok(None),
        Some(_) => required_string(field, value, max).map(Some),
    }
}

/// Raw text of a numeric field (JSON number or numeric string).
fn number_text(field: &str, value: &Option<Value>) -> ValidationResult<String> {
    match value {
        None => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::Required {
            field: field.to_string(),
        }),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ValidationError::NotANumber {
            field: field.to_string(),
        }),
    }
}

fn whole_number(field: &str, value: &Option<Value>) -> ValidationResult<i64> {
    let text = number_text(field, value)?;

    if let Ok(n) = text.parse::<i64>() {
        return Ok(n);
    }

    match text.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        Ok(f) if f.is_finite() => Err(ValidationError::NotWhole {
            field: field.to_string(),
        }),
        _ => Err(ValidationError::NotANumber {
            field: field.to_string(),
        }),
    }
}

fn money(field: &str, value: &Option<Value>) -> ValidationResult<Money> {
    let text = number_text(field, value)?;
    Money::parse_decimal(&text).ok_or_else(|| ValidationError::NotANumber {
        field: field.to_string(),
    })
}

fn calendar_date(field: &str, value: &Option<Value>) -> ValidationResult<DateTime<Utc>> {
    let text = required_string(field, value, usize::MAX)?;

    if let Ok(ts) = DateTime::parse_from_rfc3339(&text) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a calendar date".to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
