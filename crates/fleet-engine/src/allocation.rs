//! # Allocation Engine
//!
//! Moves stock between the pool and fleet/boat assignments.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  assign(itemId, fleet, boat, qty, total)                                │
//! │    pool row ──► destination ──► qty ≤ pool qty ──► total check         │
//! │       │                                                                 │
//! │       ├── merge target (name, price, unit, size, boat)?                │
//! │       │     yes → qty += n, total += t         "Existing assignment    │
//! │       │                                          updated"              │
//! │       │     no  → new row, archived = false    "Item assigned"         │
//! │       └── pool row re-persisted, lastUpdated stamped                   │
//! │           (decremented only under decrement_pool_on_assign)            │
//! │                                                                         │
//! │  modify(id, qty, [fleet, boat])                                         │
//! │    delta = qty - current            pool' = pool - delta  (≥ 0 or ✗)   │
//! │       ├── qty == 0 → pool += current, row deleted                      │
//! │       └── qty  > 0 → destination re-checked, row + pool row written    │
//! │                                                                         │
//! │  bulk_set_archived([{id, archived}])                                    │
//! │    one unit of work per row, run concurrently, failures reported       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation except the bulk archive runs in a single unit of work:
//! a failure at any step leaves both ledgers untouched.

use chrono::Utc;
use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fleet_core::allocation::{
    adjust_assignment, check_assign_quantity, merge_assignment, new_assignment, plan_rebalance,
    returned_pool_item, RebalanceOutcome,
};
use fleet_core::validation::{
    parse_archive_updates, validate_assign, validate_modify, validate_total, AssignRequest,
    DestinationNames, ModifyOrder, ModifyRequest,
};
use fleet_core::{
    Assignment, AssignmentDetail, AssignmentMergeKey, CoreError, Destination, PoolItem,
    StockLineKey,
};

use crate::error::{EngineError, EngineResult};
use crate::ports::{AssignmentLedger, FleetDirectory, LedgerStore, LedgerTx, PoolLedger};

// =============================================================================
// Policy & Outcomes
// =============================================================================

/// Knobs for how assign treats the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocationPolicy {
    /// Subtract assigned quantities from the pool row. Off by default: the
    /// pool row is re-persisted unchanged apart from `last_updated`.
    pub decrement_pool_on_assign: bool,
}

/// What an assign did.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignOutcome {
    Created(Assignment),
    Merged(Assignment),
}

impl AssignOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            AssignOutcome::Created(_) => "Item assigned",
            AssignOutcome::Merged(_) => "Existing assignment updated",
        }
    }

    pub fn assignment(&self) -> &Assignment {
        match self {
            AssignOutcome::Created(a) | AssignOutcome::Merged(a) => a,
        }
    }

    pub fn into_assignment(self) -> Assignment {
        match self {
            AssignOutcome::Created(a) | AssignOutcome::Merged(a) => a,
        }
    }
}

/// What a re-balance did.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyOutcome {
    /// Row kept at its new quantity. `pool_item` is the written pool row,
    /// if one was touched.
    Updated {
        assignment: Assignment,
        pool_item: Option<PoolItem>,
    },

    /// Row deleted, `returned` units credited to `pool_item`.
    Released {
        assignment_id: String,
        returned: i64,
        pool_item: PoolItem,
    },
}

impl ModifyOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ModifyOutcome::Updated { .. } => "Assignment updated",
            ModifyOutcome::Released { .. } => {
                "Assignment deleted and quantity returned to inventory"
            }
        }
    }
}

/// Per-row results of a bulk archive update.
#[derive(Debug, Default)]
pub struct BulkArchiveReport {
    pub updated: Vec<String>,
    pub failed: Vec<(String, EngineError)>,
}

impl BulkArchiveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn message(&self) -> String {
        if self.is_complete() {
            format!("Archive status updated for {} assignment(s)", self.updated.len())
        } else {
            format!(
                "Archive status updated for {} assignment(s), {} failed",
                self.updated.len(),
                self.failed.len()
            )
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Assign, re-balance, release and archive over any ledger store.
#[derive(Debug, Clone)]
pub struct AllocationEngine<S> {
    store: S,
    policy: AllocationPolicy,
}

impl<S: LedgerStore> AllocationEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, AllocationPolicy::default())
    }

    pub fn with_policy(store: S, policy: AllocationPolicy) -> Self {
        AllocationEngine { store, policy }
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    /// Allocates pool stock to a fleet/boat.
    ///
    /// ## Returns
    /// * `Ok(Created | Merged)` - the written assignment
    /// * `Err(NotFound)` - unknown item, fleet or boat, or boat outside fleet
    /// * `Err(Validation)` - bad payload, quantity above stock, wrong total
    pub async fn assign(&self, request: &AssignRequest) -> EngineResult<AssignOutcome> {
        let order = validate_assign(request)?;

        let mut tx = self.store.begin().await?;

        let mut item = tx
            .get_pool_item(&order.item_id)
            .await?
            .ok_or_else(|| CoreError::PoolItemNotFound(order.item_id.clone()))?;

        let destination = resolve_destination(&mut tx, &order.destination).await?;

        if let Err(err) = check_assign_quantity(&item, order.quantity) {
            warn!(item_id = %item.id, requested = order.quantity, available = item.quantity, "Assign exceeds stock");
            return Err(err.into());
        }

        validate_total(
            item.unit_price().line_total(order.quantity, item.unit_size),
            order.total,
        )?;

        let merge_key = AssignmentMergeKey::for_item(&item, &destination.boat.id);
        let outcome = match tx.find_merge_target(&merge_key).await? {
            Some(mut existing) => {
                merge_assignment(&mut existing, order.quantity, order.total, order.effective_date);
                tx.update_assignment(&existing).await?;
                AssignOutcome::Merged(existing)
            }
            None => {
                let note = order
                    .note
                    .clone()
                    .filter(|note| !note.is_empty())
                    .unwrap_or_else(|| item.note.clone());
                let assignment = new_assignment(
                    Uuid::new_v4().to_string(),
                    &item,
                    &destination,
                    order.quantity,
                    order.total,
                    note,
                    order.effective_date,
                );
                tx.insert_assignment(&assignment).await?;
                AssignOutcome::Created(assignment)
            }
        };

        if self.policy.decrement_pool_on_assign {
            item.set_quantity(item.quantity - order.quantity);
        }
        item.last_updated = Some(Utc::now());
        tx.update_pool_item(&item).await?;

        tx.commit().await?;

        info!(
            assignment_id = %outcome.assignment().id,
            item_id = %item.id,
            fleet = %destination.fleet.name,
            boat = %destination.boat.name,
            quantity = order.quantity,
            merged = matches!(outcome, AssignOutcome::Merged(_)),
            "Stock assigned"
        );
        Ok(outcome)
    }

    /// Re-balances an assignment to a new quantity and, optionally, a new
    /// destination. Quantity zero releases the row.
    pub async fn modify(&self, id: &str, request: &ModifyRequest) -> EngineResult<ModifyOutcome> {
        let order = validate_modify(request)?;
        self.apply_modify(id, order).await
    }

    /// Returns an assignment's whole quantity to the pool and deletes it.
    pub async fn release(&self, id: &str) -> EngineResult<ModifyOutcome> {
        self.apply_modify(
            id,
            ModifyOrder {
                quantity: 0,
                destination: None,
            },
        )
        .await
    }

    async fn apply_modify(&self, id: &str, order: ModifyOrder) -> EngineResult<ModifyOutcome> {
        let mut tx = self.store.begin().await?;

        let mut assignment = tx
            .get_assignment(id)
            .await?
            .ok_or_else(|| CoreError::AssignmentNotFound(id.to_string()))?;

        let pool_row = tx
            .find_stock_line(&StockLineKey::of_assignment(&assignment), None)
            .await?;

        let plan = match plan_rebalance(
            assignment.quantity,
            order.quantity,
            pool_row.as_ref().map(|row| row.quantity),
        ) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(id = %id, requested = order.quantity, error = %err, "Re-balance rejected");
                return Err(err.into());
            }
        };

        debug!(id = %id, delta = plan.delta, new_pool_quantity = plan.new_pool_quantity, "Re-balance planned");

        let now = Utc::now();

        if let RebalanceOutcome::Release { returned } = plan.outcome {
            let pool_item = self
                .write_pool_balance(&mut tx, pool_row, &assignment, plan.new_pool_quantity)
                .await?;

            if !tx.delete_assignment(id).await? {
                return Err(CoreError::AssignmentNotFound(id.to_string()).into());
            }
            tx.commit().await?;

            info!(id = %id, returned, pool_item_id = %pool_item.id, "Assignment released to inventory");
            return Ok(ModifyOutcome::Released {
                assignment_id: id.to_string(),
                returned,
                pool_item,
            });
        }

        let destination = match &order.destination {
            Some(names) => resolve_destination(&mut tx, names).await?,
            None => revalidate_destination(&mut tx, &assignment.fleet_id, &assignment.boat_id)
                .await?,
        };

        let pool_item = if plan.touches_pool(pool_row.is_some()) {
            Some(
                self.write_pool_balance(&mut tx, pool_row, &assignment, plan.new_pool_quantity)
                    .await?,
            )
        } else {
            None
        };

        adjust_assignment(&mut assignment, order.quantity, &destination, now);
        tx.update_assignment(&assignment).await?;
        tx.commit().await?;

        info!(
            id = %id,
            quantity = assignment.quantity,
            delta = plan.delta,
            boat = %destination.boat.name,
            "Assignment re-balanced"
        );
        Ok(ModifyOutcome::Updated {
            assignment,
            pool_item,
        })
    }

    /// Sets the pool row's balance, creating the row from `assignment` when
    /// none exists.
    async fn write_pool_balance(
        &self,
        tx: &mut S::Tx,
        pool_row: Option<PoolItem>,
        assignment: &Assignment,
        quantity: i64,
    ) -> EngineResult<PoolItem> {
        let now = Utc::now();
        match pool_row {
            Some(mut item) => {
                item.set_quantity(quantity);
                item.last_updated = Some(now);
                tx.update_pool_item(&item).await?;
                Ok(item)
            }
            None => {
                let item =
                    returned_pool_item(Uuid::new_v4().to_string(), assignment, quantity, now);
                tx.insert_pool_item(&item).await?;
                debug!(pool_item_id = %item.id, quantity, "Pool row created from returned stock");
                Ok(item)
            }
        }
    }

    /// Active assignments with destination names.
    pub async fn list_active(&self) -> EngineResult<Vec<AssignmentDetail>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_assignments(false).await?)
    }

    /// Archived assignments with destination names.
    pub async fn list_archived(&self) -> EngineResult<Vec<AssignmentDetail>> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_assignments(true).await?)
    }

    /// Applies `[{id, archived}, ...]`.
    ///
    /// Each row is updated in its own unit of work and the updates run
    /// concurrently; a failed row does not roll back the others. A payload
    /// that is not an array of well-formed entries fails as a whole.
    pub async fn bulk_set_archived(&self, payload: &Value) -> EngineResult<BulkArchiveReport> {
        let updates = parse_archive_updates(payload)?;

        let results = join_all(updates.iter().map(|update| async move {
            let mut tx = self.store.begin().await?;
            if !tx.set_archived(&update.id, update.archived).await? {
                return Err(EngineError::from(CoreError::AssignmentNotFound(
                    update.id.clone(),
                )));
            }
            tx.commit().await
        }))
        .await;

        let mut report = BulkArchiveReport::default();
        for (update, result) in updates.into_iter().zip(results) {
            match result {
                Ok(()) => report.updated.push(update.id),
                Err(err) => {
                    warn!(id = %update.id, error = %err, "Archive update failed");
                    report.failed.push((update.id, err));
                }
            }
        }

        info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "Bulk archive applied"
        );
        Ok(report)
    }

    /// Deletes an assignment. Its stock is not returned; use
    /// [`AllocationEngine::release`] for that.
    pub async fn remove(&self, id: &str) -> EngineResult<()> {
        let mut tx = self.store.begin().await?;

        if !tx.delete_assignment(id).await? {
            return Err(CoreError::AssignmentNotFound(id.to_string()).into());
        }
        tx.commit().await?;

        info!(id = %id, "Assignment removed");
        Ok(())
    }
}

// =============================================================================
// Destination Checks
// =============================================================================

/// Looks up a destination by names and checks boat membership.
async fn resolve_destination<D: FleetDirectory>(
    directory: &mut D,
    names: &DestinationNames,
) -> EngineResult<Destination> {
    let fleet = directory
        .find_fleet_by_name(&names.fleet)
        .await?
        .ok_or_else(|| CoreError::FleetNotFound(names.fleet.clone()))?;

    let boat = directory
        .find_boat_by_name(&names.boat)
        .await?
        .ok_or_else(|| CoreError::BoatNotFound(names.boat.clone()))?;

    membership(fleet, boat)
}

/// Re-checks a stored destination by ids.
async fn revalidate_destination<D: FleetDirectory>(
    directory: &mut D,
    fleet_id: &str,
    boat_id: &str,
) -> EngineResult<Destination> {
    let fleet = directory
        .get_fleet(fleet_id)
        .await?
        .ok_or_else(|| CoreError::FleetNotFound(fleet_id.to_string()))?;

    let boat = directory
        .get_boat(boat_id)
        .await?
        .ok_or_else(|| CoreError::BoatNotFound(boat_id.to_string()))?;

    membership(fleet, boat)
}

fn membership(fleet: fleet_core::Fleet, boat: fleet_core::Boat) -> EngineResult<Destination> {
    if boat.fleet_id != fleet.id {
        return Err(CoreError::BoatNotInFleet {
            boat: boat.name,
            fleet: fleet.name,
        }
        .into());
    }
    Ok(Destination { fleet, boat })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::InventoryService;
    use crate::store::{MemoryStore, SqliteStore};
    use fleet_core::validation::PoolItemRequest;
    use fleet_core::{Boat, ErrorKind, Fleet};
    use fleet_db::{Database, DbConfig, FleetRepository};
    use serde_json::json;

    /// Store with fleets "North" (boats "Sea Wolf", "Gull") and "South"
    /// (boat "Tern"), plus a 10-unit pool row of nets at $10 per 2.
    async fn seeded() -> (MemoryStore, PoolItem) {
        let store = MemoryStore::new();
        let north = store.add_fleet("North").await.unwrap();
        let south = store.add_fleet("South").await.unwrap();
        store.add_boat(&north.id, "Sea Wolf").await.unwrap();
        store.add_boat(&north.id, "Gull").await.unwrap();
        store.add_boat(&south.id, "Tern").await.unwrap();

        let item = InventoryService::new(store.clone())
            .create(&pool_request(10, 50.0))
            .await
            .unwrap();
        (store, item)
    }

    fn pool_request(quantity: i64, total: f64) -> PoolItemRequest {
        serde_json::from_value(json!({
            "name": "Gill Net",
            "note": "40mm",
            "quantity": quantity,
            "unitPrice": 10,
            "selectUnit": "Roll",
            "unitSize": 2,
            "total": total,
            "dateCreated": "2026-10-01"
        }))
        .unwrap()
    }

    fn assign_request(item_id: &str, boat: &str, quantity: i64, total: f64) -> AssignRequest {
        let fleet = if boat == "Tern" { "South" } else { "North" };
        serde_json::from_value(json!({
            "itemId": item_id,
            "fleet": fleet,
            "boat": boat,
            "quantity": quantity,
            "total": total,
            "date": "2026-10-10"
        }))
        .unwrap()
    }

    fn modify_request(body: Value) -> ModifyRequest {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_assign_creates_assignment() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());

        let outcome = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap();

        assert_eq!(outcome.message(), "Item assigned");
        let assignment = outcome.assignment();
        assert_eq!(assignment.quantity, 2);
        assert_eq!(assignment.total_cents, 1000);
        assert_eq!(assignment.note, "40mm");
        assert!(!assignment.archived);

        // pool untouched apart from last_updated
        let pool = store.pool_items().await;
        assert_eq!(pool[0].quantity, 10);
        assert!(pool[0].last_updated.is_some());
    }

    #[tokio::test]
    async fn test_repeat_assign_merges() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());

        engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap();
        let outcome = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 3, 15.0))
            .await
            .unwrap();

        assert_eq!(outcome.message(), "Existing assignment updated");
        assert_eq!(outcome.assignment().quantity, 5);
        assert_eq!(outcome.assignment().total_cents, 2500);
        assert_eq!(store.assignments().await.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_other_boat_does_not_merge() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());

        engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap();
        engine
            .assign(&assign_request(&item.id, "Gull", 2, 10.0))
            .await
            .unwrap();

        assert_eq!(store.assignments().await.len(), 2);
        assert_eq!(engine.list_active().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_assign_zero_rejected_before_lookup() {
        let engine = AllocationEngine::new(MemoryStore::new());
        let err = engine
            .assign(&assign_request("missing", "Sea Wolf", 0, 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_assign_more_than_stock() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());

        let err = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 12, 60.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("available quantity 10"));
        assert!(store.assignments().await.is_empty());
    }

    #[tokio::test]
    async fn test_assign_total_mismatch() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());

        let err = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 3, 15.01))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_core(),
            Some(CoreError::Validation(
                fleet_core::ValidationError::TotalMismatch { .. }
            ))
        ));
        assert!(store.pool_items().await[0].last_updated.is_none());
    }

    #[tokio::test]
    async fn test_assign_destination_checks() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store);

        let mut request = assign_request(&item.id, "Tern", 2, 10.0);
        request.fleet = Some(json!("North"));
        let err = engine.assign(&request).await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::BoatNotInFleet { .. })));

        let err = engine
            .assign(&assign_request(&item.id, "Kraken", 2, 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Boat not found: Kraken");

        let err = engine
            .assign(&assign_request("nope", "Sea Wolf", 2, 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_decrement_policy() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::with_policy(
            store.clone(),
            AllocationPolicy {
                decrement_pool_on_assign: true,
            },
        );

        engine
            .assign(&assign_request(&item.id, "Sea Wolf", 4, 20.0))
            .await
            .unwrap();

        let pool = store.pool_items().await;
        assert_eq!(pool[0].quantity, 6);
        assert_eq!(pool[0].total_cents, 3000);
    }

    #[tokio::test]
    async fn test_release_returns_quantity() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 5, 25.0))
            .await
            .unwrap()
            .into_assignment();

        let outcome = engine
            .modify(&assigned.id, &modify_request(json!({ "quantity": 0 })))
            .await
            .unwrap();

        assert_eq!(
            outcome.message(),
            "Assignment deleted and quantity returned to inventory"
        );
        match outcome {
            ModifyOutcome::Released {
                returned,
                pool_item,
                ..
            } => {
                assert_eq!(returned, 5);
                assert_eq!(pool_item.quantity, 15);
                assert_eq!(pool_item.total_cents, 7500);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(store.assignments().await.is_empty());
        assert_eq!(store.pool_items().await[0].quantity, 15);
    }

    #[tokio::test]
    async fn test_modify_above_balance_rejected() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 5, 25.0))
            .await
            .unwrap()
            .into_assignment();

        let err = engine
            .modify(&assigned.id, &modify_request(json!({ "quantity": 16 })))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Insufficient inventory quantity"));
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert_eq!(store.assignments().await[0].quantity, 5);
        assert_eq!(store.pool_items().await[0].quantity, 10);
    }

    #[tokio::test]
    async fn test_reduce_merged_row_above_pool_ceiling() {
        let (store, _) = seeded().await;
        let ice = InventoryService::new(store.clone())
            .create(
                &serde_json::from_value(json!({
                    "name": "Ice",
                    "note": "Dock 2",
                    "quantity": 10_000,
                    "unitPrice": 3.5,
                    "selectUnit": "Bag",
                    "unitSize": 1,
                    "total": 35_000,
                    "dateCreated": "2026-10-01"
                }))
                .unwrap(),
            )
            .await
            .unwrap();
        let engine = AllocationEngine::new(store.clone());

        engine
            .assign(&assign_request(&ice.id, "Sea Wolf", 10_000, 35_000.0))
            .await
            .unwrap();
        let merged = engine
            .assign(&assign_request(&ice.id, "Sea Wolf", 10_000, 35_000.0))
            .await
            .unwrap()
            .into_assignment();
        assert_eq!(merged.quantity, 20_000);

        let outcome = engine
            .modify(&merged.id, &modify_request(json!({ "quantity": 15_000 })))
            .await
            .unwrap();

        match outcome {
            ModifyOutcome::Updated {
                assignment,
                pool_item,
            } => {
                assert_eq!(assignment.quantity, 15_000);
                assert_eq!(pool_item.unwrap().quantity, 15_000);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_modify_moves_stock_and_destination() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 5, 25.0))
            .await
            .unwrap()
            .into_assignment();

        let outcome = engine
            .modify(
                &assigned.id,
                &modify_request(json!({ "quantity": 7, "fleet": "South", "boat": "Tern" })),
            )
            .await
            .unwrap();

        match outcome {
            ModifyOutcome::Updated {
                assignment,
                pool_item,
            } => {
                assert_eq!(assignment.quantity, 7);
                assert_eq!(assignment.total_cents, 3500);
                assert!(assignment.last_updated.is_some());
                assert_eq!(pool_item.unwrap().quantity, 8);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let active = engine.list_active().await.unwrap();
        assert_eq!(active[0].boat_name, "Tern");
        assert_eq!(active[0].fleet_name, "South");
    }

    #[tokio::test]
    async fn test_modify_requires_fleet_with_boat() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store);
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 5, 25.0))
            .await
            .unwrap()
            .into_assignment();

        let err = engine
            .modify(
                &assigned.id,
                &modify_request(json!({ "quantity": 3, "boat": "Gull" })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("fleet"));

        let err = engine
            .modify(&assigned.id, &modify_request(json!({ "quantity": -1 })))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_release_without_pool_row_creates_one() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 4, 20.0))
            .await
            .unwrap()
            .into_assignment();
        InventoryService::new(store.clone())
            .remove(&item.id)
            .await
            .unwrap();

        let outcome = engine.release(&assigned.id).await.unwrap();

        let pool = store.pool_items().await;
        assert_eq!(pool.len(), 1);
        assert_ne!(pool[0].id, item.id);
        assert_eq!(pool[0].quantity, 4);
        assert_eq!(pool[0].total_cents, 2000);
        assert_eq!(pool[0].note, "40mm");
        assert!(pool[0].last_updated.is_none());
        assert!(matches!(outcome, ModifyOutcome::Released { returned: 4, .. }));
    }

    #[tokio::test]
    async fn test_unchanged_quantity_without_pool_row_writes_no_pool() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 4, 20.0))
            .await
            .unwrap()
            .into_assignment();
        InventoryService::new(store.clone())
            .remove(&item.id)
            .await
            .unwrap();

        let outcome = engine
            .modify(&assigned.id, &modify_request(json!({ "quantity": 4 })))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            ModifyOutcome::Updated {
                pool_item: None,
                ..
            }
        ));
        assert!(store.pool_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_modify_unknown_assignment() {
        let engine = AllocationEngine::new(MemoryStore::new());
        let err = engine.release("a404").await.unwrap_err();
        assert_eq!(err.to_string(), "Assignment not found: a404");

        let err = engine.remove("a404").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_remove_does_not_return_stock() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::with_policy(
            store.clone(),
            AllocationPolicy {
                decrement_pool_on_assign: true,
            },
        );
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 4, 20.0))
            .await
            .unwrap()
            .into_assignment();

        engine.remove(&assigned.id).await.unwrap();

        assert!(store.assignments().await.is_empty());
        assert_eq!(store.pool_items().await[0].quantity, 6);
    }

    #[tokio::test]
    async fn test_bulk_archive_reports_failures() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let first = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap()
            .into_assignment();
        let second = engine
            .assign(&assign_request(&item.id, "Gull", 2, 10.0))
            .await
            .unwrap()
            .into_assignment();

        let report = engine
            .bulk_set_archived(&json!([
                { "id": first.id, "archived": true },
                { "id": "ghost", "archived": true },
                { "id": second.id, "archived": false }
            ]))
            .await
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.updated, vec![first.id.clone(), second.id.clone()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "ghost");

        let archived = engine.list_archived().await.unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].assignment.id, first.id);
        assert_eq!(engine.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_archive_rejects_non_array() {
        let engine = AllocationEngine::new(MemoryStore::new());
        let err = engine
            .bulk_set_archived(&json!({ "id": "a1", "archived": true }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_archived_row_is_not_a_merge_target() {
        let (store, item) = seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let first = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap()
            .into_assignment();
        engine
            .bulk_set_archived(&json!([{ "id": first.id, "archived": true }]))
            .await
            .unwrap();

        let outcome = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 3, 15.0))
            .await
            .unwrap();
        assert!(matches!(outcome, AssignOutcome::Created(_)));
        assert_eq!(store.assignments().await.len(), 2);
    }

    // -------------------------------------------------------------------------
    // SQLite-backed
    // -------------------------------------------------------------------------

    async fn sqlite_seeded() -> (SqliteStore, PoolItem) {
        sqlite_seeded_with(DbConfig::in_memory()).await
    }

    async fn sqlite_seeded_with(config: DbConfig) -> (SqliteStore, PoolItem) {
        let db = Database::new(config).await.unwrap();
        {
            let mut conn = db.acquire().await.unwrap();
            let mut directory = FleetRepository::new(&mut conn);
            directory
                .insert_fleet(&Fleet {
                    id: "f-north".into(),
                    name: "North".into(),
                })
                .await
                .unwrap();
            directory
                .insert_boat(&Boat {
                    id: "b-wolf".into(),
                    fleet_id: "f-north".into(),
                    name: "Sea Wolf".into(),
                })
                .await
                .unwrap();
            directory
                .insert_boat(&Boat {
                    id: "b-gull".into(),
                    fleet_id: "f-north".into(),
                    name: "Gull".into(),
                })
                .await
                .unwrap();
        }

        let store = SqliteStore::new(db);
        let item = InventoryService::new(store.clone())
            .create(&pool_request(10, 50.0))
            .await
            .unwrap();
        (store, item)
    }

    #[tokio::test]
    async fn test_sqlite_assign_merge_and_release() {
        let (store, item) = sqlite_seeded().await;
        let engine = AllocationEngine::new(store.clone());

        engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap();
        let merged = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 3, 15.0))
            .await
            .unwrap();
        assert!(matches!(merged, AssignOutcome::Merged(_)));

        let active = engine.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].assignment.quantity, 5);
        assert_eq!(active[0].boat_name, "Sea Wolf");

        engine.release(&active[0].assignment.id).await.unwrap();

        let inventory = InventoryService::new(store);
        assert_eq!(inventory.get(&item.id).await.unwrap().quantity, 15);
        assert!(engine.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_rejected_rebalance_leaves_rows() {
        let (store, item) = sqlite_seeded().await;
        let engine = AllocationEngine::new(store.clone());
        let assigned = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 5, 25.0))
            .await
            .unwrap()
            .into_assignment();

        let err = engine
            .modify(&assigned.id, &modify_request(json!({ "quantity": 20 })))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let active = engine.list_active().await.unwrap();
        assert_eq!(active[0].assignment.quantity, 5);
        let inventory = InventoryService::new(store);
        assert_eq!(inventory.get(&item.id).await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn test_sqlite_file_bulk_archive_runs_rows_concurrently() {
        let path = std::env::temp_dir().join(format!("fleet-archive-{}.db", Uuid::new_v4()));
        let (store, item) = sqlite_seeded_with(DbConfig::new(&path).max_connections(4)).await;
        let engine = AllocationEngine::new(store.clone());

        let first = engine
            .assign(&assign_request(&item.id, "Sea Wolf", 2, 10.0))
            .await
            .unwrap()
            .into_assignment();
        let second = engine
            .assign(&assign_request(&item.id, "Gull", 2, 10.0))
            .await
            .unwrap()
            .into_assignment();

        let report = engine
            .bulk_set_archived(&json!([
                { "id": first.id, "archived": true },
                { "id": "ghost", "archived": true },
                { "id": second.id, "archived": true }
            ]))
            .await
            .unwrap();

        assert_eq!(report.updated, vec![first.id.clone(), second.id.clone()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "ghost");
        assert_eq!(report.failed[0].1.kind(), ErrorKind::NotFound);

        assert_eq!(engine.list_archived().await.unwrap().len(), 2);
        assert!(engine.list_active().await.unwrap().is_empty());

        store.database().close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
