//! Storage ports consumed by the ledger.
//!
//! The persistence crate implements these against PostgreSQL; the in-memory
//! store in [`super::memory`] implements them for tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::pagination::Cursor;

use crate::error::StoreError;
use crate::models::{
    ItemId, ItemKind, ItemSnapshot, Movement, MovementTotals, NewItem, NewMovement,
};

/// Opens transactions spanning an item update and its movement insert.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    type Transaction: LedgerTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;
}

/// One open ledger transaction.
///
/// Dropping a transaction without committing discards every staged write.
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Reads an item and holds it against concurrent movements until the
    /// transaction ends. Returns `None` when no item of that kind exists.
    async fn lock_item(
        &mut self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<Option<ItemSnapshot>, StoreError>;

    async fn set_current_quantity(
        &mut self,
        kind: ItemKind,
        item_id: ItemId,
        quantity: Decimal,
    ) -> Result<(), StoreError>;

    /// Appends a movement; the store assigns its id and timestamp.
    async fn append_movement(&mut self, movement: &NewMovement) -> Result<Movement, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

/// Catalog access the ledger depends on. Items are seeded and deactivated
/// here, never deleted.
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    async fn register_item(&self, item: &NewItem) -> Result<ItemSnapshot, StoreError>;

    /// Soft-deletes an item. Returns false if it did not exist or was
    /// already inactive.
    async fn deactivate_item(&self, kind: ItemKind, item_id: ItemId) -> Result<bool, StoreError>;

    async fn get_item_snapshot(
        &self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<Option<ItemSnapshot>, StoreError>;

    /// Active items of one kind, ordered by id.
    async fn list_stock_levels(&self, kind: ItemKind) -> Result<Vec<ItemSnapshot>, StoreError>;
}

/// Read side of the append-only movement log.
#[async_trait]
pub trait MovementLog: Send + Sync {
    /// Movements of one item, newest first, strictly after `after`.
    async fn list_for_item(
        &self,
        kind: ItemKind,
        item_id: ItemId,
        after: Option<Cursor>,
        limit: i64,
    ) -> Result<Vec<Movement>, StoreError>;

    /// Most recent movements across both kinds and directions.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Movement>, StoreError>;

    async fn totals_for_item(
        &self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<MovementTotals, StoreError>;
}
