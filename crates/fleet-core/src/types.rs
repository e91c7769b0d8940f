//! # Domain Types
//!
//! Core domain types used throughout Fleet Supply.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    PoolItem     │   │   Assignment    │   │   Fleet / Boat  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id             │       │
//! │  │  name, note     │   │  stock line     │   │  name           │       │
//! │  │  quantity       │   │  fleet_id (FK)  │   │  fleet_id (FK)  │       │
//! │  │  unit_price     │   │  boat_id  (FK)  │   └─────────────────┘       │
//! │  │  unit_size      │   │  archived       │                             │
//! │  │  total          │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  A "stock line" is (name, note, unit price, select unit, unit size).   │
//! │  Pool items and assignments both carry one; see `signature`.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary fields are stored as cents (`*_cents`) and exposed as
//! [`Money`] through accessor methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Pool Item
// =============================================================================

/// A record of undistributed stock in the shared pool.
///
/// ## Invariant
/// `total_cents == unit_price.line_total(quantity, unit_size)`; every
/// quantity change goes through [`PoolItem::set_quantity`] to keep it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PoolItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock line name, e.g. "Nylon Net 40mm".
    pub name: String,

    /// Free-text note (supplier, colour, lot).
    pub note: String,

    /// Units currently in the pool.
    pub quantity: i64,

    /// Price in cents for `unit_size` units.
    pub unit_price_cents: i64,

    /// Unit label chosen on intake ("Box", "Roll", "Litre").
    pub select_unit: String,

    /// How many units the unit price covers.
    pub unit_size: i64,

    /// Value of the pool quantity in cents.
    pub total_cents: i64,

    #[ts(as = "String")]
    pub date_created: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl PoolItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the stored total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// The total this record should carry for its current quantity.
    #[inline]
    pub fn expected_total(&self) -> Money {
        self.unit_price().line_total(self.quantity, self.unit_size)
    }

    /// Sets the quantity and recomputes the total.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.total_cents = self.expected_total().cents();
    }

    /// Short description attached to conflict errors.
    pub fn summary(&self) -> StockSummary {
        StockSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.unit_price().as_decimal(),
            unit_size: self.unit_size,
            select_unit: self.select_unit.clone(),
        }
    }
}

// =============================================================================
// Assignment
// =============================================================================

/// A quantity of one stock line allocated to a fleet/boat destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    pub note: String,
    /// Never negative; a row that would reach zero is deleted instead.
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub select_unit: String,
    pub unit_size: i64,
    /// Summed on merge, recomputed on re-balance.
    pub total_cents: i64,
    pub fleet_id: String,
    pub boat_id: String,
    #[ts(as = "String")]
    pub out_date: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub last_updated: Option<DateTime<Utc>>,
    pub archived: bool,
}

impl Assignment {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the stored total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Sets the quantity and recomputes the total from the unit price.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.total_cents = self.unit_price().line_total(quantity, self.unit_size).cents();
    }
}

/// An assignment joined with its destination names, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssignmentDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub assignment: Assignment,
    pub fleet_name: String,
    pub boat_name: String,
}

// =============================================================================
// Fleet / Boat
// =============================================================================

/// A fleet. Master data owned elsewhere; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Fleet {
    pub id: String,
    pub name: String,
}

/// A boat, owned by exactly one fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Boat {
    pub id: String,
    pub fleet_id: String,
    pub name: String,
}

/// A resolved, membership-checked destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub fleet: Fleet,
    pub boat: Boat,
}

// =============================================================================
// Stock Summary
// =============================================================================

/// The colliding row reported by duplicate and edit-conflict errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockSummary {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub unit_size: i64,
    pub select_unit: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> PoolItem {
        PoolItem {
            id: "item-1".to_string(),
            name: "Gill Net".to_string(),
            note: "40mm mesh".to_string(),
            quantity: 10,
            unit_price_cents: 1000,
            select_unit: "Roll".to_string(),
            unit_size: 3,
            total_cents: 3333,
            date_created: Utc::now(),
            last_updated: None,
        }
    }

    #[test]
    fn test_expected_total() {
        let item = sample_item();
        assert_eq!(item.expected_total().cents(), 3333);
        assert_eq!(item.total(), item.expected_total());
    }

    #[test]
    fn test_set_quantity_keeps_total_invariant() {
        let mut item = sample_item();
        item.set_quantity(4);
        assert_eq!(item.quantity, 4);
        assert_eq!(item.total_cents, 1333);

        item.set_quantity(0);
        assert_eq!(item.total_cents, 0);
    }

    #[test]
    fn test_summary() {
        let summary = sample_item().summary();
        assert_eq!(summary.id, "item-1");
        assert_eq!(summary.unit_price, 10.0);
        assert_eq!(summary.unit_size, 3);
        assert_eq!(summary.select_unit, "Roll");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(sample_item().summary()).unwrap();
        assert_eq!(json["unitPrice"], 10.0);
        assert_eq!(json["selectUnit"], "Roll");
    }
}
