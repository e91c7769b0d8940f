//! # Allocation Rules
//!
//! Quantity bookkeeping between the pool and assignments, without I/O.
//!
//! The services in `fleet-engine` load records, call into this module to
//! decide what the records should become, and persist the result.
//!
//! ## Re-balance
//! ```text
//!   existing assignment qty = 5        pool row qty = 3
//!   requested qty           = 7
//!
//!   delta            = 7 - 5 = 2
//!   new pool qty     = 3 - 2 = 1       ✓ (≥ 0)
//!
//!   requested qty           = 0        → Release: pool gains 5, row deleted
//!   requested qty           = 9        → delta 4, pool 3 - 4 < 0 ✗
//! ```
//!
//! A missing pool row counts as quantity zero.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Assignment, Destination, PoolItem};

// =============================================================================
// Assign
// =============================================================================

/// Rejects an assign that asks for more than the pool row holds.
pub fn check_assign_quantity(item: &PoolItem, requested: i64) -> CoreResult<()> {
    if requested > item.quantity {
        return Err(CoreError::InsufficientStock {
            name: item.name.clone(),
            requested,
            available: item.quantity,
        });
    }
    Ok(())
}

/// Builds the assignment created by a first allocation.
pub fn new_assignment(
    id: String,
    item: &PoolItem,
    destination: &Destination,
    quantity: i64,
    total: Money,
    note: String,
    out_date: DateTime<Utc>,
) -> Assignment {
    Assignment {
        id,
        name: item.name.clone(),
        note,
        quantity,
        unit_price_cents: item.unit_price_cents,
        select_unit: item.select_unit.clone(),
        unit_size: item.unit_size,
        total_cents: total.cents(),
        fleet_id: destination.fleet.id.clone(),
        boat_id: destination.boat.id.clone(),
        out_date,
        last_updated: None,
        archived: false,
    }
}

/// Folds a repeat allocation into an existing assignment.
///
/// Quantities and totals are summed; the total is not re-rounded.
pub fn merge_assignment(
    existing: &mut Assignment,
    quantity: i64,
    total: Money,
    effective_date: DateTime<Utc>,
) {
    existing.quantity += quantity;
    existing.total_cents = (existing.total() + total).cents();
    existing.last_updated = Some(effective_date);
}

// =============================================================================
// Re-balance
// =============================================================================

/// What a re-balance does to the assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceOutcome {
    /// Quantity reached zero: delete the row, `returned` units go back.
    Release { returned: i64 },
    /// Keep the row at the new quantity.
    Adjust,
}

/// The quantity transfer computed for a re-balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebalancePlan {
    /// `new_quantity - existing_quantity`; positive draws from the pool.
    pub delta: i64,
    /// Pool balance after the transfer.
    pub new_pool_quantity: i64,
    pub outcome: RebalanceOutcome,
}

impl RebalancePlan {
    /// True when the pool row needs a write.
    ///
    /// With no matching pool row and nothing to return, nothing is created.
    pub fn touches_pool(&self, pool_row_exists: bool) -> bool {
        pool_row_exists || self.new_pool_quantity > 0
    }
}

/// Plans a re-balance from `existing_quantity` to `new_quantity`.
///
/// ## Arguments
/// * `pool_quantity` - quantity of the matching pool row, `None` if absent
///
/// ## Returns
/// * `Ok(plan)` - the transfer to apply
/// * `Err(CoreError::InsufficientInventory)` - the pool cannot cover it
pub fn plan_rebalance(
    existing_quantity: i64,
    new_quantity: i64,
    pool_quantity: Option<i64>,
) -> CoreResult<RebalancePlan> {
    let available = pool_quantity.unwrap_or(0);
    let delta = new_quantity - existing_quantity;
    let new_pool_quantity = available - delta;

    if new_pool_quantity < 0 {
        return Err(CoreError::InsufficientInventory {
            available,
            required: delta,
        });
    }

    let outcome = if new_quantity == 0 {
        RebalanceOutcome::Release {
            returned: existing_quantity,
        }
    } else {
        RebalanceOutcome::Adjust
    };

    Ok(RebalancePlan {
        delta,
        new_pool_quantity,
        outcome,
    })
}

/// A fresh pool row holding stock returned from `assignment`.
pub fn returned_pool_item(
    id: String,
    assignment: &Assignment,
    quantity: i64,
    now: DateTime<Utc>,
) -> PoolItem {
    let mut item = PoolItem {
        id,
        name: assignment.name.clone(),
        note: assignment.note.clone(),
        quantity: 0,
        unit_price_cents: assignment.unit_price_cents,
        select_unit: assignment.select_unit.clone(),
        unit_size: assignment.unit_size,
        total_cents: 0,
        date_created: now,
        last_updated: None,
    };
    item.set_quantity(quantity);
    item
}

/// Moves an assignment to a new quantity and destination.
pub fn adjust_assignment(
    assignment: &mut Assignment,
    quantity: i64,
    destination: &Destination,
    now: DateTime<Utc>,
) {
    assignment.set_quantity(quantity);
    assignment.fleet_id = destination.fleet.id.clone();
    assignment.boat_id = destination.boat.id.clone();
    assignment.last_updated = Some(now);
}

// =============================================================================
// Unit Tests
// =============================================================================
