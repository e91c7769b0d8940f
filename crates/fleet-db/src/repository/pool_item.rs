//! # Pool Item Repository
//!
//! Database operations for the undistributed stock pool.
//!
//! ## Signature Lookups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find_duplicate(PoolDuplicateKey)   name, note, select_unit, unit_size │
//! │       used by: create                                                  │
//! │                                                                         │
//! │  find_stock_line(StockLineKey)      name, unit_price, unit_size,       │
//! │       used by: edit (excluding the  select_unit                        │
//! │       edited row), re-balance                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Both return the oldest matching row when several match.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fleet_core::{PoolDuplicateKey, PoolItem, StockLineKey};

const COLUMNS: &str = "id, name, note, quantity, unit_price_cents, select_unit, unit_size, \
                       total_cents, date_created, last_updated";

/// Repository for pool item database operations.
///
/// Borrows a connection so the same calls work inside a transaction.
#[derive(Debug)]
pub struct PoolItemRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> PoolItemRepository<'c> {
    /// Creates a new PoolItemRepository on `conn`.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        PoolItemRepository { conn }
    }

    /// Lists every pool row, newest first.
    pub async fn list_all(&mut self) -> DbResult<Vec<PoolItem>> {
        let sql = format!(
            "SELECT {} FROM pool_items ORDER BY date_created DESC, id",
            COLUMNS
        );
        let items = sqlx::query_as::<_, PoolItem>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        debug!(count = items.len(), "Listed pool items");
        Ok(items)
    }

    /// Gets a pool row by id.
    pub async fn get_by_id(&mut self, id: &str) -> DbResult<Option<PoolItem>> {
        debug!(id = %id, "Getting pool item by ID");

        let sql = format!("SELECT {} FROM pool_items WHERE id = ?1", COLUMNS);
        let item = sqlx::query_as::<_, PoolItem>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(item)
    }

    /// Finds a row with the same duplicate-on-create signature.
    pub async fn find_duplicate(&mut self, key: &PoolDuplicateKey) -> DbResult<Option<PoolItem>> {
        let sql = format!(
            "SELECT {} FROM pool_items \
             WHERE name = ?1 AND note = ?2 AND select_unit = ?3 AND unit_size = ?4 \
             ORDER BY date_created, id LIMIT 1",
            COLUMNS
        );
        let item = sqlx::query_as::<_, PoolItem>(&sql)
            .bind(&key.name)
            .bind(&key.note)
            .bind(&key.select_unit)
            .bind(key.unit_size)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(item)
    }

    /// Finds a row on the same stock line, optionally skipping one id.
    pub async fn find_stock_line(
        &mut self,
        key: &StockLineKey,
        exclude_id: Option<&str>,
    ) -> DbResult<Option<PoolItem>> {
        let sql = format!(
            "SELECT {} FROM pool_items \
             WHERE name = ?1 AND unit_price_cents = ?2 AND unit_size = ?3 AND select_unit = ?4 \
             AND (?5 IS NULL OR id <> ?5) \
             ORDER BY date_created, id LIMIT 1",
            COLUMNS
        );
        let item = sqlx::query_as::<_, PoolItem>(&sql)
            .bind(&key.name)
            .bind(key.unit_price_cents)
            .bind(key.unit_size)
            .bind(&key.select_unit)
            .bind(exclude_id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(item)
    }

    /// Inserts a new pool row.
    pub async fn insert(&mut self, item: &PoolItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "Inserting pool item");

        sqlx::query(
            "INSERT INTO pool_items (id, name, note, quantity, unit_price_cents, select_unit, \
             unit_size, total_cents, date_created, last_updated) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.note)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(&item.select_unit)
        .bind(item.unit_size)
        .bind(item.total_cents)
        .bind(item.date_created)
        .bind(item.last_updated)
        .execute(&mut *self.conn)
        .await?;

        Ok(())
    }

    /// Rewrites every column of an existing row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no row has this id
    pub async fn update(&mut self, item: &PoolItem) -> DbResult<()> {
        debug!(id = %item.id, quantity = item.quantity, "Updating pool item");

        let result = sqlx::query(
            "UPDATE pool_items SET name = ?2, note = ?3, quantity = ?4, unit_price_cents = ?5, \
             select_unit = ?6, unit_size = ?7, total_cents = ?8, date_created = ?9, \
             last_updated = ?10 WHERE id = ?1",
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.note)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(&item.select_unit)
        .bind(item.unit_size)
        .bind(item.total_cents)
        .bind(item.date_created)
        .bind(item.last_updated)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", &item.id));
        }

        Ok(())
    }

    /// Deletes a pool row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no row has this id
    pub async fn delete(&mut self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting pool item");

        let result = sqlx::query("DELETE FROM pool_items WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Counts pool rows.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pool_items")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}
