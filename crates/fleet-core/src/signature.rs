//! # Signature Matching
//!
//! Decides when two stock records are "the same stock line".
//!
//! Three different field sets are in use, one per operation:
//!
//! ```text
//! ┌──────────────────────────┬───────────────────────────────────────────┐
//! │ Key                      │ Fields                                    │
//! ├──────────────────────────┼───────────────────────────────────────────┤
//! │ PoolDuplicateKey         │ name, note, select_unit, unit_size        │
//! │   create pool item       │   match → Conflict (existing summary)     │
//! ├──────────────────────────┼───────────────────────────────────────────┤
//! │ AssignmentMergeKey       │ name, unit_price, select_unit, unit_size, │
//! │   assign                 │ boat_id   match → merge into that row     │
//! ├──────────────────────────┼───────────────────────────────────────────┤
//! │ StockLineKey             │ name, unit_price, unit_size, select_unit  │
//! │   edit pool item         │   match on another row → Conflict         │
//! │   re-balance assignment  │   locates the pool row to draw/return     │
//! └──────────────────────────┴───────────────────────────────────────────┘
//! ```
//!
//! The sets are not unified: note takes part in duplicate detection but
//! not in merging, and unit price takes part in merging but not in
//! duplicate detection. Matching is exact and case-sensitive.

use crate::types::{Assignment, PoolItem};
use crate::validation::PoolItemDraft;

/// Duplicate-on-create signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolDuplicateKey {
    pub name: String,
    pub note: String,
    pub select_unit: String,
    pub unit_size: i64,
}

impl PoolDuplicateKey {
    pub fn of_draft(draft: &PoolItemDraft) -> Self {
        PoolDuplicateKey {
            name: draft.name.clone(),
            note: draft.note.clone(),
            select_unit: draft.select_unit.clone(),
            unit_size: draft.unit_size,
        }
    }

    pub fn of_item(item: &PoolItem) -> Self {
        PoolDuplicateKey {
            name: item.name.clone(),
            note: item.note.clone(),
            select_unit: item.select_unit.clone(),
            unit_size: item.unit_size,
        }
    }

    pub fn matches(&self, item: &PoolItem) -> bool {
        *self == PoolDuplicateKey::of_item(item)
    }
}

/// Price-aware stock line signature used by edit conflicts and re-balancing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StockLineKey {
    pub name: String,
    pub unit_price_cents: i64,
    pub unit_size: i64,
    pub select_unit: String,
}

impl StockLineKey {
    pub fn of_draft(draft: &PoolItemDraft) -> Self {
        StockLineKey {
            name: draft.name.clone(),
            unit_price_cents: draft.unit_price.cents(),
            unit_size: draft.unit_size,
            select_unit: draft.select_unit.clone(),
        }
    }

    pub fn of_item(item: &PoolItem) -> Self {
        StockLineKey {
            name: item.name.clone(),
            unit_price_cents: item.unit_price_cents,
            unit_size: item.unit_size,
            select_unit: item.select_unit.clone(),
        }
    }

    pub fn of_assignment(assignment: &Assignment) -> Self {
        StockLineKey {
            name: assignment.name.clone(),
            unit_price_cents: assignment.unit_price_cents,
            unit_size: assignment.unit_size,
            select_unit: assignment.select_unit.clone(),
        }
    }

    pub fn matches(&self, item: &PoolItem) -> bool {
        *self == StockLineKey::of_item(item)
    }
}

/// Merge-on-assign signature: the stock line plus the receiving boat.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentMergeKey {
    pub name: String,
    pub unit_price_cents: i64,
    pub select_unit: String,
    pub unit_size: i64,
    pub boat_id: String,
}

impl AssignmentMergeKey {
    /// Key for assigning `item` to `boat_id`.
    pub fn for_item(item: &PoolItem, boat_id: &str) -> Self {
        AssignmentMergeKey {
            name: item.name.clone(),
            unit_price_cents: item.unit_price_cents,
            select_unit: item.select_unit.clone(),
            unit_size: item.unit_size,
            boat_id: boat_id.to_string(),
        }
    }

    pub fn of_assignment(assignment: &Assignment) -> Self {
        AssignmentMergeKey {
            name: assignment.name.clone(),
            unit_price_cents: assignment.unit_price_cents,
            select_unit: assignment.select_unit.clone(),
            unit_size: assignment.unit_size,
            boat_id: assignment.boat_id.clone(),
        }
    }

    pub fn matches(&self, assignment: &Assignment) -> bool {
        *self == AssignmentMergeKey::of_assignment(assignment)
    }
}

/// True when `draft` changes nothing on `existing` apart from dates.
///
/// Compared fields: name, note, quantity, unit price, select unit, unit
/// size and total.
pub fn is_unchanged(draft: &PoolItemDraft, existing: &PoolItem) -> bool {
    draft.name == existing.name
        && draft.note == existing.note
        && draft.quantity == existing.quantity
        && draft.unit_price.cents() == existing.unit_price_cents
        && draft.select_unit == existing.select_unit
        && draft.unit_size == existing.unit_size
        && draft.total.cents() == existing.total_cents
}

// =============================================================================
// Unit Tests
// =============================================================================
