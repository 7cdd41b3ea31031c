//! In-memory ledger store for development and testing.
//!
//! A transaction holds the whole store lock and writes to a staged copy of
//! the state, which replaces the live state only on commit.

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use rust_decimal::Decimal;
use shared::pagination::Cursor;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::store::{ItemCatalog, LedgerStore, LedgerTransaction, MovementLog};
use crate::error::StoreError;
use crate::models::{
    validate_stock_level, ItemId, ItemKind, ItemSnapshot, Movement, MovementTotals, NewItem,
    NewMovement,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    items: BTreeMap<(ItemKind, ItemId), ItemSnapshot>,
    movements: Vec<Movement>,
    last_item_id: ItemId,
    last_movement_id: i64,
}

impl MemoryState {
    fn item_mut(&mut self, kind: ItemKind, item_id: ItemId) -> Result<&mut ItemSnapshot, StoreError> {
        self.items
            .get_mut(&(kind, item_id))
            .ok_or_else(|| StoreError::Constraint(format!("{} {} does not exist", kind, item_id)))
    }

    /// Movements newest first, ties broken by id.
    fn newest_first(&self) -> impl Iterator<Item = &Movement> {
        let mut sorted: Vec<&Movement> = self.movements.iter().collect();
        sorted.sort_by(|a, b| (b.occurred_at, b.id).cmp(&(a.occurred_at, a.id)));
        sorted.into_iter()
    }
}

/// Ledger store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
    fail_appends: Arc<AtomicBool>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent movement append fail until switched off.
    pub fn fail_movement_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

/// Transaction over [`InMemoryLedgerStore`].
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    fail_appends: bool,
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    type Transaction = InMemoryTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction {
            guard,
            staged,
            fail_appends: self.fail_appends.load(Ordering::SeqCst),
        })
    }
}

#[async_trait]
impl LedgerTransaction for InMemoryTransaction {
    async fn lock_item(
        &mut self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<Option<ItemSnapshot>, StoreError> {
        Ok(self.staged.items.get(&(kind, item_id)).cloned())
    }

    async fn set_current_quantity(
        &mut self,
        kind: ItemKind,
        item_id: ItemId,
        quantity: Decimal,
    ) -> Result<(), StoreError> {
        validate_stock_level(quantity)
            .map_err(|e| StoreError::Constraint(e.code.into_owned()))?;
        self.staged.item_mut(kind, item_id)?.current_quantity = quantity;
        Ok(())
    }

    async fn append_movement(&mut self, movement: &NewMovement) -> Result<Movement, StoreError> {
        if self.fail_appends {
            return Err(StoreError::Unavailable(
                "movement log rejected the write".to_string(),
            ));
        }
        if movement.quantity <= Decimal::ZERO {
            return Err(StoreError::Constraint("quantity must be positive".to_string()));
        }
        self.staged.item_mut(movement.item_kind, movement.item_id)?;

        self.staged.last_movement_id += 1;
        let stored = Movement {
            id: self.staged.last_movement_id,
            item_id: movement.item_id,
            item_kind: movement.item_kind,
            direction: movement.direction,
            quantity: movement.quantity,
            reason: movement.reason.clone(),
            // Postgres keeps microseconds; match it so cursors round-trip.
            occurred_at: Utc::now().trunc_subsecs(6),
        };
        self.staged.movements.push(stored.clone());
        Ok(stored)
    }

    async fn commit(self) -> Result<(), StoreError> {
        let InMemoryTransaction {
            mut guard, staged, ..
        } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ItemCatalog for InMemoryLedgerStore {
    async fn register_item(&self, item: &NewItem) -> Result<ItemSnapshot, StoreError> {
        item.validate()
            .map_err(|e| StoreError::Constraint(e.code.into_owned()))?;

        let mut state = self.state.lock().await;
        state.last_item_id += 1;
        let snapshot = ItemSnapshot {
            id: state.last_item_id,
            kind: item.kind,
            name: item.name.trim().to_string(),
            initial_quantity: item.initial_quantity,
            current_quantity: item.initial_quantity,
            min_quantity: item.min_quantity,
            active: true,
        };
        state
            .items
            .insert((snapshot.kind, snapshot.id), snapshot.clone());
        Ok(snapshot)
    }

    async fn deactivate_item(&self, kind: ItemKind, item_id: ItemId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        match state.items.get_mut(&(kind, item_id)) {
            Some(item) if item.active => {
                item.active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get_item_snapshot(
        &self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<Option<ItemSnapshot>, StoreError> {
        Ok(self.state.lock().await.items.get(&(kind, item_id)).cloned())
    }

    async fn list_stock_levels(&self, kind: ItemKind) -> Result<Vec<ItemSnapshot>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.kind == kind && item.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MovementLog for InMemoryLedgerStore {
    async fn list_for_item(
        &self,
        kind: ItemKind,
        item_id: ItemId,
        after: Option<Cursor>,
        limit: i64,
    ) -> Result<Vec<Movement>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .newest_first()
            .filter(|m| m.item_kind == kind && m.item_id == item_id)
            .filter(|m| match after {
                Some(cursor) => (m.occurred_at, m.id) < (cursor.occurred_at, cursor.id),
                None => true,
            })
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Movement>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .newest_first()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn totals_for_item(
        &self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<MovementTotals, StoreError> {
        let state = self.state.lock().await;
        Ok(MovementTotals::from_movements(
            state
                .movements
                .iter()
                .filter(|m| m.item_kind == kind && m.item_id == item_id),
        ))
    }
}
