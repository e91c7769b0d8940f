//! # Ledger Ports
//!
//! The storage seams the services are written against.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryService / AllocationEngine                                   │
//! │       │                                                                 │
//! │       │  store.begin()                                                  │
//! │       ▼                                                                 │
//! │  ┌──────────────────── LedgerTx (one unit of work) ─────────────────┐  │
//! │  │  PoolLedger          AssignmentLedger         FleetDirectory     │  │
//! │  │  pool rows           assignment rows          fleets, boats (ro) │  │
//! │  └───────────────────────────────┬──────────────────────────────────┘  │
//! │                                  │ commit()  → all writes visible       │
//! │                                  │ drop      → nothing visible          │
//! │                                  ▼                                      │
//! │           SqliteStore (sqlx transaction)   MemoryStore (tests)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deletes and archive updates report whether a row was found (`bool`);
//! the services turn `false` into the entity-specific not-found error.

use async_trait::async_trait;

use fleet_core::{
    Assignment, AssignmentDetail, AssignmentMergeKey, Boat, Fleet, PoolDuplicateKey, PoolItem,
    StockLineKey,
};

use crate::error::EngineResult;

/// Undistributed stock.
#[async_trait]
pub trait PoolLedger: Send {
    /// Every pool row, newest first.
    async fn list_pool_items(&mut self) -> EngineResult<Vec<PoolItem>>;

    async fn get_pool_item(&mut self, id: &str) -> EngineResult<Option<PoolItem>>;

    async fn find_duplicate(&mut self, key: &PoolDuplicateKey) -> EngineResult<Option<PoolItem>>;

    /// Oldest row on `key`'s stock line other than `exclude_id`.
    async fn find_stock_line(
        &mut self,
        key: &StockLineKey,
        exclude_id: Option<&str>,
    ) -> EngineResult<Option<PoolItem>>;

    async fn insert_pool_item(&mut self, item: &PoolItem) -> EngineResult<()>;

    async fn update_pool_item(&mut self, item: &PoolItem) -> EngineResult<()>;

    async fn delete_pool_item(&mut self, id: &str) -> EngineResult<bool>;
}

/// Stock allocated to destinations.
#[async_trait]
pub trait AssignmentLedger: Send {
    async fn list_assignments(&mut self, archived: bool) -> EngineResult<Vec<AssignmentDetail>>;

    async fn get_assignment(&mut self, id: &str) -> EngineResult<Option<Assignment>>;

    /// Active row a new allocation merges into.
    async fn find_merge_target(
        &mut self,
        key: &AssignmentMergeKey,
    ) -> EngineResult<Option<Assignment>>;

    async fn insert_assignment(&mut self, assignment: &Assignment) -> EngineResult<()>;

    async fn update_assignment(&mut self, assignment: &Assignment) -> EngineResult<()>;

    async fn set_archived(&mut self, id: &str, archived: bool) -> EngineResult<bool>;

    async fn delete_assignment(&mut self, id: &str) -> EngineResult<bool>;
}

/// Read-only fleet/boat directory.
#[async_trait]
pub trait FleetDirectory: Send {
    async fn find_fleet_by_name(&mut self, name: &str) -> EngineResult<Option<Fleet>>;

    async fn find_boat_by_name(&mut self, name: &str) -> EngineResult<Option<Boat>>;

    async fn get_fleet(&mut self, id: &str) -> EngineResult<Option<Fleet>>;

    async fn get_boat(&mut self, id: &str) -> EngineResult<Option<Boat>>;
}

/// A unit of work spanning all three ports.
#[async_trait]
pub trait LedgerTx: PoolLedger + AssignmentLedger + FleetDirectory + Send {
    /// Makes every write in this unit of work visible.
    async fn commit(self) -> EngineResult<()>;
}

/// Hands out units of work.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    type Tx: LedgerTx;

    async fn begin(&self) -> EngineResult<Self::Tx>;
}
