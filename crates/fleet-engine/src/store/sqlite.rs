//! SQLite ledger store.
//!
//! Each unit of work is one `sqlx` transaction; the ports forward to the
//! `fleet-db` repositories on that transaction's connection.

use async_trait::async_trait;
use tracing::debug;

use fleet_core::{
    Assignment, AssignmentDetail, AssignmentMergeKey, Boat, Fleet, PoolDuplicateKey, PoolItem,
    StockLineKey,
};
use fleet_db::{
    AssignmentRepository, Database, DbError, DbResult, DbTransaction, FleetRepository,
    PoolItemRepository,
};

use crate::config::FleetConfig;
use crate::error::{EngineError, EngineResult};
use crate::ports::{AssignmentLedger, FleetDirectory, LedgerStore, LedgerTx, PoolLedger};

/// Ledger store over a [`Database`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        SqliteStore { db }
    }

    /// Opens (and migrates) the database named by `config`.
    pub async fn connect(config: &FleetConfig) -> EngineResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(SqliteStore { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    type Tx = SqliteTx;

    async fn begin(&self) -> EngineResult<SqliteTx> {
        let tx = self.db.begin().await?;
        Ok(SqliteTx { tx })
    }
}

/// Unit of work over a [`SqliteStore`].
#[derive(Debug)]
pub struct SqliteTx {
    tx: DbTransaction,
}

/// `Ok(false)` for a missing row, errors otherwise.
fn found(result: DbResult<()>) -> EngineResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl LedgerTx for SqliteTx {
    async fn commit(self) -> EngineResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| EngineError::Store(DbError::TransactionFailed(e.to_string())))?;
        debug!("Unit of work committed");
        Ok(())
    }
}

#[async_trait]
impl PoolLedger for SqliteTx {
    async fn list_pool_items(&mut self) -> EngineResult<Vec<PoolItem>> {
        Ok(PoolItemRepository::new(&mut self.tx).list_all().await?)
    }

    async fn get_pool_item(&mut self, id: &str) -> EngineResult<Option<PoolItem>> {
        Ok(PoolItemRepository::new(&mut self.tx).get_by_id(id).await?)
    }

    async fn find_duplicate(&mut self, key: &PoolDuplicateKey) -> EngineResult<Option<PoolItem>> {
        Ok(PoolItemRepository::new(&mut self.tx)
            .find_duplicate(key)
            .await?)
    }

    async fn find_stock_line(
        &mut self,
        key: &StockLineKey,
        exclude_id: Option<&str>,
    ) -> EngineResult<Option<PoolItem>> {
        Ok(PoolItemRepository::new(&mut self.tx)
            .find_stock_line(key, exclude_id)
            .await?)
    }

    async fn insert_pool_item(&mut self, item: &PoolItem) -> EngineResult<()> {
        Ok(PoolItemRepository::new(&mut self.tx).insert(item).await?)
    }

    async fn update_pool_item(&mut self, item: &PoolItem) -> EngineResult<()> {
        Ok(PoolItemRepository::new(&mut self.tx).update(item).await?)
    }

    async fn delete_pool_item(&mut self, id: &str) -> EngineResult<bool> {
        found(PoolItemRepository::new(&mut self.tx).delete(id).await)
    }
}

#[async_trait]
impl AssignmentLedger for SqliteTx {
    async fn list_assignments(&mut self, archived: bool) -> EngineResult<Vec<AssignmentDetail>> {
        Ok(AssignmentRepository::new(&mut self.tx)
            .list_detailed(archived)
            .await?)
    }

    async fn get_assignment(&mut self, id: &str) -> EngineResult<Option<Assignment>> {
        Ok(AssignmentRepository::new(&mut self.tx).get_by_id(id).await?)
    }

    async fn find_merge_target(
        &mut self,
        key: &AssignmentMergeKey,
    ) -> EngineResult<Option<Assignment>> {
        Ok(AssignmentRepository::new(&mut self.tx)
            .find_merge_target(key)
            .await?)
    }

    async fn insert_assignment(&mut self, assignment: &Assignment) -> EngineResult<()> {
        Ok(AssignmentRepository::new(&mut self.tx)
            .insert(assignment)
            .await?)
    }

    async fn update_assignment(&mut self, assignment: &Assignment) -> EngineResult<()> {
        Ok(AssignmentRepository::new(&mut self.tx)
            .update(assignment)
            .await?)
    }

    async fn set_archived(&mut self, id: &str, archived: bool) -> EngineResult<bool> {
        found(
            AssignmentRepository::new(&mut self.tx)
                .set_archived(id, archived)
                .await,
        )
    }

    async fn delete_assignment(&mut self, id: &str) -> EngineResult<bool> {
        found(AssignmentRepository::new(&mut self.tx).delete(id).await)
    }
}

#[async_trait]
impl FleetDirectory for SqliteTx {
    async fn find_fleet_by_name(&mut self, name: &str) -> EngineResult<Option<Fleet>> {
        Ok(FleetRepository::new(&mut self.tx)
            .find_fleet_by_name(name)
            .await?)
    }

    async fn find_boat_by_name(&mut self, name: &str) -> EngineResult<Option<Boat>> {
        Ok(FleetRepository::new(&mut self.tx)
            .find_boat_by_name(name)
            .await?)
    }

    async fn get_fleet(&mut self, id: &str) -> EngineResult<Option<Fleet>> {
        Ok(FleetRepository::new(&mut self.tx).get_fleet(id).await?)
    }

    async fn get_boat(&mut self, id: &str) -> EngineResult<Option<Boat>> {
        Ok(FleetRepository::new(&mut self.tx).get_boat(id).await?)
    }
}
