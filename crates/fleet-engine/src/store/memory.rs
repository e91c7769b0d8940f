//! In-memory ledger store.
//!
//! Units of work are serialized behind one async mutex. Each unit of work
//! edits a private copy of the state; `commit` swaps the copy in, dropping
//! the unit of work throws it away.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use fleet_core::{
    Assignment, AssignmentDetail, AssignmentMergeKey, Boat, Fleet, PoolDuplicateKey, PoolItem,
    StockLineKey,
};
use fleet_db::DbError;

use crate::error::EngineResult;
use crate::ports::{AssignmentLedger, FleetDirectory, LedgerStore, LedgerTx, PoolLedger};

#[derive(Debug, Clone, Default)]
struct State {
    pool_items: Vec<PoolItem>,
    assignments: Vec<Assignment>,
    fleets: Vec<Fleet>,
    boats: Vec<Boat>,
}

/// Ledger store backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fleet. Names are unique.
    pub async fn add_fleet(&self, name: &str) -> EngineResult<Fleet> {
        let mut state = self.state.lock().await;
        if state.fleets.iter().any(|f| f.name == name) {
            return Err(DbError::duplicate("fleets.name", name).into());
        }

        let fleet = Fleet {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        state.fleets.push(fleet.clone());
        Ok(fleet)
    }

    /// Registers a boat under `fleet_id`. Names are unique across fleets.
    pub async fn add_boat(&self, fleet_id: &str, name: &str) -> EngineResult<Boat> {
        let mut state = self.state.lock().await;
        if !state.fleets.iter().any(|f| f.id == fleet_id) {
            return Err(DbError::ForeignKeyViolation {
                message: format!("unknown fleet {}", fleet_id),
            }
            .into());
        }
        if state.boats.iter().any(|b| b.name == name) {
            return Err(DbError::duplicate("boats.name", name).into());
        }

        let boat = Boat {
            id: Uuid::new_v4().to_string(),
            fleet_id: fleet_id.to_string(),
            name: name.to_string(),
        };
        state.boats.push(boat.clone());
        Ok(boat)
    }

    /// Committed pool rows, in insertion order.
    pub async fn pool_items(&self) -> Vec<PoolItem> {
        self.state.lock().await.pool_items.clone()
    }

    /// Committed assignment rows, in insertion order.
    pub async fn assignments(&self) -> Vec<Assignment> {
        self.state.lock().await.assignments.clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> EngineResult<MemoryTx> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx { guard, working })
    }
}

/// Unit of work over a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryTx {
    guard: OwnedMutexGuard<State>,
    working: State,
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn commit(self) -> EngineResult<()> {
        let MemoryTx { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}

/// `(date, id)` ascending, the order the SQLite lookups use.
fn oldest_first(
    a_date: &DateTime<Utc>,
    a_id: &str,
    b_date: &DateTime<Utc>,
    b_id: &str,
) -> Ordering {
    a_date.cmp(b_date).then_with(|| a_id.cmp(b_id))
}

#[async_trait]
impl PoolLedger for MemoryTx {
    async fn list_pool_items(&mut self) -> EngineResult<Vec<PoolItem>> {
        let mut items = self.working.pool_items.clone();
        items.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(items)
    }

    async fn get_pool_item(&mut self, id: &str) -> EngineResult<Option<PoolItem>> {
        Ok(self.working.pool_items.iter().find(|i| i.id == id).cloned())
    }

    async fn find_duplicate(&mut self, key: &PoolDuplicateKey) -> EngineResult<Option<PoolItem>> {
        Ok(self
            .working
            .pool_items
            .iter()
            .filter(|i| key.matches(i))
            .min_by(|a, b| oldest_first(&a.date_created, &a.id, &b.date_created, &b.id))
            .cloned())
    }

    async fn find_stock_line(
        &mut self,
        key: &StockLineKey,
        exclude_id: Option<&str>,
    ) -> EngineResult<Option<PoolItem>> {
        Ok(self
            .working
            .pool_items
            .iter()
            .filter(|i| Some(i.id.as_str()) != exclude_id && key.matches(i))
            .min_by(|a, b| oldest_first(&a.date_created, &a.id, &b.date_created, &b.id))
            .cloned())
    }

    async fn insert_pool_item(&mut self, item: &PoolItem) -> EngineResult<()> {
        if self.working.pool_items.iter().any(|i| i.id == item.id) {
            return Err(DbError::duplicate("pool_items.id", &item.id).into());
        }
        self.working.pool_items.push(item.clone());
        Ok(())
    }

    async fn update_pool_item(&mut self, item: &PoolItem) -> EngineResult<()> {
        match self.working.pool_items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item.clone();
                Ok(())
            }
            None => Err(DbError::not_found("Inventory item", &item.id).into()),
        }
    }

    async fn delete_pool_item(&mut self, id: &str) -> EngineResult<bool> {
        let before = self.working.pool_items.len();
        self.working.pool_items.retain(|i| i.id != id);
        Ok(self.working.pool_items.len() < before)
    }
}

#[async_trait]
impl AssignmentLedger for MemoryTx {
    async fn list_assignments(&mut self, archived: bool) -> EngineResult<Vec<AssignmentDetail>> {
        let state = &self.working;
        let mut details: Vec<AssignmentDetail> = state
            .assignments
            .iter()
            .filter(|a| a.archived == archived)
            .filter_map(|a| {
                let fleet = state.fleets.iter().find(|f| f.id == a.fleet_id)?;
                let boat = state.boats.iter().find(|b| b.id == a.boat_id)?;
                Some(AssignmentDetail {
                    assignment: a.clone(),
                    fleet_name: fleet.name.clone(),
                    boat_name: boat.name.clone(),
                })
            })
            .collect();

        details.sort_by(|a, b| {
            b.assignment
                .out_date
                .cmp(&a.assignment.out_date)
                .then_with(|| a.assignment.id.cmp(&b.assignment.id))
        });
        Ok(details)
    }

    async fn get_assignment(&mut self, id: &str) -> EngineResult<Option<Assignment>> {
        Ok(self.working.assignments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_merge_target(
        &mut self,
        key: &AssignmentMergeKey,
    ) -> EngineResult<Option<Assignment>> {
        Ok(self
            .working
            .assignments
            .iter()
            .filter(|a| !a.archived && key.matches(a))
            .min_by(|a, b| oldest_first(&a.out_date, &a.id, &b.out_date, &b.id))
            .cloned())
    }

    async fn insert_assignment(&mut self, assignment: &Assignment) -> EngineResult<()> {
        if self.working.assignments.iter().any(|a| a.id == assignment.id) {
            return Err(DbError::duplicate("assignments.id", &assignment.id).into());
        }
        self.working.assignments.push(assignment.clone());
        Ok(())
    }

    async fn update_assignment(&mut self, assignment: &Assignment) -> EngineResult<()> {
        match self
            .working
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment.id)
        {
            Some(slot) => {
                *slot = assignment.clone();
                Ok(())
            }
            None => Err(DbError::not_found("Assignment", &assignment.id).into()),
        }
    }

    async fn set_archived(&mut self, id: &str, archived: bool) -> EngineResult<bool> {
        match self.working.assignments.iter_mut().find(|a| a.id == id) {
            Some(slot) => {
                slot.archived = archived;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_assignment(&mut self, id: &str) -> EngineResult<bool> {
        let before = self.working.assignments.len();
        self.working.assignments.retain(|a| a.id != id);
        Ok(self.working.assignments.len() < before)
    }
}

#[async_trait]
impl FleetDirectory for MemoryTx {
    async fn find_fleet_by_name(&mut self, name: &str) -> EngineResult<Option<Fleet>> {
        Ok(self.working.fleets.iter().find(|f| f.name == name).cloned())
    }

    async fn find_boat_by_name(&mut self, name: &str) -> EngineResult<Option<Boat>> {
        Ok(self.working.boats.iter().find(|b| b.name == name).cloned())
    }

    async fn get_fleet(&mut self, id: &str) -> EngineResult<Option<Fleet>> {
        Ok(self.working.fleets.iter().find(|f| f.id == id).cloned())
    }

    async fn get_boat(&mut self, id: &str) -> EngineResult<Option<Boat>> {
        Ok(self.working.boats.iter().find(|b| b.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn item(id: &str) -> PoolItem {
        PoolItem {
            id: id.to_string(),
            name: "Hooks".to_string(),
            note: "size 6".to_string(),
            quantity: 40,
            unit_price_cents: 350,
            select_unit: "Box".to_string(),
            unit_size: 4,
            total_cents: 3500,
            date_created: Utc::now(),
            last_updated: None,
        }
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.insert_pool_item(&item("p1")).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.pool_items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_drop_discards_writes() {
        let store = MemoryStore::new();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_pool_item(&item("p1")).await.unwrap();
            assert!(tx.get_pool_item("p1").await.unwrap().is_some());
        }

        assert!(store.pool_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_directory_uniqueness() {
        let store = MemoryStore::new();
        let fleet = store.add_fleet("North Fleet").await.unwrap();
        assert!(store.add_fleet("North Fleet").await.is_err());

        store.add_boat(&fleet.id, "Sea Wolf").await.unwrap();
        assert!(store.add_boat(&fleet.id, "Sea Wolf").await.is_err());
        assert!(store.add_boat("missing", "Gannet").await.is_err());

        let mut tx = store.begin().await.unwrap();
        let boat = tx.find_boat_by_name("Sea Wolf").await.unwrap().unwrap();
        assert_eq!(boat.fleet_id, fleet.id);
    }

    #[tokio::test]
    async fn test_stock_line_excludes_id() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let hooks = item("p1");
        tx.insert_pool_item(&hooks).await.unwrap();

        let key = StockLineKey::of_item(&hooks);
        assert!(tx.find_stock_line(&key, None).await.unwrap().is_some());
        assert!(tx.find_stock_line(&key, Some("p1")).await.unwrap().is_none());
        assert!(tx.delete_pool_item("p1").await.unwrap());
        assert!(!tx.delete_pool_item("p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_lookups_pick_oldest_row() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let base = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let mut newer = item("p-a");
        newer.date_created = base + Duration::days(3);
        let mut older = item("p-b");
        older.note = "size 8".to_string();
        older.date_created = base;
        tx.insert_pool_item(&newer).await.unwrap();
        tx.insert_pool_item(&older).await.unwrap();

        let key = StockLineKey::of_item(&newer);
        let found = tx.find_stock_line(&key, None).await.unwrap().unwrap();
        assert_eq!(found.id, "p-b");

        let template = Assignment {
            id: "a-z".to_string(),
            name: newer.name.clone(),
            note: newer.note.clone(),
            quantity: 4,
            unit_price_cents: newer.unit_price_cents,
            select_unit: newer.select_unit.clone(),
            unit_size: newer.unit_size,
            total_cents: 350,
            fleet_id: "f1".to_string(),
            boat_id: "b1".to_string(),
            out_date: base + Duration::days(5),
            last_updated: None,
            archived: false,
        };
        let earlier = Assignment {
            id: "a-y".to_string(),
            out_date: base + Duration::days(1),
            ..template.clone()
        };
        tx.insert_assignment(&template).await.unwrap();
        tx.insert_assignment(&earlier).await.unwrap();

        let merge_key = AssignmentMergeKey::for_item(&newer, "b1");
        let target = tx.find_merge_target(&merge_key).await.unwrap().unwrap();
        assert_eq!(target.id, "a-y");
    }
}
