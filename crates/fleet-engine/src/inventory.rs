//! # Inventory Service
//!
//! Pool operations: list, get, create, edit, remove.
//!
//! ## Create / Edit Checks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(payload)                                                        │
//! │    validate_pool_item ──✗──► VALIDATION_ERROR                          │
//! │    find_duplicate(name, note, unit, unit size) ──match──► CONFLICT     │
//! │    insert                                                              │
//! │                                                                         │
//! │  edit(id, payload)                                                      │
//! │    validate_pool_item ──✗──► VALIDATION_ERROR                          │
//! │    get_pool_item(id) ──none──► NOT_FOUND                               │
//! │    is_unchanged ──yes──► CONFLICT ("No changes detected")              │
//! │    find_stock_line(name, price, size, unit; other rows) ──► CONFLICT   │
//! │    update                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use fleet_core::signature::is_unchanged;
use fleet_core::validation::{validate_pool_item, PoolItemDraft, PoolItemRequest};
use fleet_core::{CoreError, PoolDuplicateKey, PoolItem, StockLineKey};

use crate::error::EngineResult;
use crate::ports::{LedgerStore, LedgerTx, PoolLedger};

/// Pool CRUD over any ledger store.
#[derive(Debug, Clone)]
pub struct InventoryService<S> {
    store: S,
}

impl<S: LedgerStore> InventoryService<S> {
    pub fn new(store: S) -> Self {
        InventoryService { store }
    }

    /// Every pool row, newest first. An empty pool is not-found.
    pub async fn list(&self) -> EngineResult<Vec<PoolItem>> {
        let mut tx = self.store.begin().await?;
        let items = tx.list_pool_items().await?;

        if items.is_empty() {
            return Err(CoreError::PoolEmpty.into());
        }

        debug!(count = items.len(), "Listed inventory");
        Ok(items)
    }

    pub async fn get(&self, id: &str) -> EngineResult<PoolItem> {
        let mut tx = self.store.begin().await?;
        tx.get_pool_item(id)
            .await?
            .ok_or_else(|| CoreError::PoolItemNotFound(id.to_string()).into())
    }

    /// Adds a pool row.
    ///
    /// ## Returns
    /// * `Ok(item)` - the stored row
    /// * `Err(Conflict)` - a row with the same name, note, unit and unit
    ///   size exists; the error carries its summary
    pub async fn create(&self, request: &PoolItemRequest) -> EngineResult<PoolItem> {
        let draft = validate_pool_item(request)?;

        let mut tx = self.store.begin().await?;

        if let Some(existing) = tx.find_duplicate(&PoolDuplicateKey::of_draft(&draft)).await? {
            warn!(existing_id = %existing.id, name = %draft.name, "Duplicate inventory item");
            return Err(CoreError::DuplicateStockLine(existing.summary()).into());
        }

        let item = from_draft(Uuid::new_v4().to_string(), draft, None);
        tx.insert_pool_item(&item).await?;
        tx.commit().await?;

        info!(id = %item.id, name = %item.name, quantity = item.quantity, "Inventory item created");
        Ok(item)
    }

    /// Replaces a pool row's fields.
    pub async fn edit(&self, id: &str, request: &PoolItemRequest) -> EngineResult<PoolItem> {
        let draft = validate_pool_item(request)?;

        let mut tx = self.store.begin().await?;

        let existing = tx
            .get_pool_item(id)
            .await?
            .ok_or_else(|| CoreError::PoolItemNotFound(id.to_string()))?;

        if is_unchanged(&draft, &existing) {
            return Err(CoreError::NoChanges(id.to_string()).into());
        }

        if let Some(other) = tx
            .find_stock_line(&StockLineKey::of_draft(&draft), Some(id))
            .await?
        {
            warn!(id = %id, conflicting_id = %other.id, "Edit collides with another item");
            return Err(CoreError::ConflictingStockLine(other.summary()).into());
        }

        let item = from_draft(existing.id, draft, Some(Utc::now()));
        tx.update_pool_item(&item).await?;
        tx.commit().await?;

        info!(id = %item.id, quantity = item.quantity, "Inventory item updated");
        Ok(item)
    }

    pub async fn remove(&self, id: &str) -> EngineResult<()> {
        let mut tx = self.store.begin().await?;

        if !tx.delete_pool_item(id).await? {
            return Err(CoreError::PoolItemNotFound(id.to_string()).into());
        }
        tx.commit().await?;

        info!(id = %id, "Inventory item removed");
        Ok(())
    }
}

fn from_draft(
    id: String,
    draft: PoolItemDraft,
    last_updated: Option<chrono::DateTime<Utc>>,
) -> PoolItem {
    PoolItem {
        id,
        name: draft.name,
        note: draft.note,
        quantity: draft.quantity,
        unit_price_cents: draft.unit_price.cents(),
        select_unit: draft.select_unit,
        unit_size: draft.unit_size,
        total_cents: draft.total.cents(),
        date_created: draft.date_created,
        last_updated,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
