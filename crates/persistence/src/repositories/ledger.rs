//! Transactional ledger store on PostgreSQL.
//!
//! The item row is read with `SELECT ... FOR UPDATE`, so concurrent movements
//! against one item queue on the row lock instead of overwriting each other's
//! quantity. The quantity update and the movement insert share the
//! transaction; nothing is visible until commit.

use async_trait::async_trait;
use domain::models::{ItemId, ItemKind, ItemSnapshot, Movement, NewMovement};
use domain::services::{LedgerStore, LedgerTransaction};
use domain::StoreError;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use super::kind::stock_table;
use super::store_error;
use crate::entities::{ItemEntity, MovementEntity};
use crate::metrics::QueryTimer;

/// Opens ledger transactions on the shared pool.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// One open ledger transaction. Rolled back by sqlx if dropped uncommitted.
pub struct PgLedgerTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    type Transaction = PgLedgerTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError> {
        let tx = self.pool.begin().await.map_err(store_error)?;
        Ok(PgLedgerTransaction { tx })
    }
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    async fn lock_item(
        &mut self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<Option<ItemSnapshot>, StoreError> {
        let timer = QueryTimer::new("lock_item");
        let result = sqlx::query_as::<_, ItemEntity>(&stock_table(kind).select_item_sql(true))
            .bind(item_id)
            .fetch_optional(&mut *self.tx)
            .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .map(|entity| entity.into_domain(kind)))
    }

    async fn set_current_quantity(
        &mut self,
        kind: ItemKind,
        item_id: ItemId,
        quantity: Decimal,
    ) -> Result<(), StoreError> {
        let timer = QueryTimer::new("set_current_quantity");
        let result = sqlx::query(&stock_table(kind).set_quantity_sql())
            .bind(item_id)
            .bind(quantity)
            .execute(&mut *self.tx)
            .await;
        timer.record();

        if result.map_err(store_error)?.rows_affected() == 0 {
            return Err(StoreError::Constraint(format!(
                "{} {} vanished inside its transaction",
                kind, item_id
            )));
        }
        Ok(())
    }

    async fn append_movement(&mut self, movement: &NewMovement) -> Result<Movement, StoreError> {
        let table = stock_table(movement.item_kind);
        let timer = QueryTimer::new("append_movement");
        let result =
            sqlx::query_as::<_, MovementEntity>(&table.insert_movement_sql(movement.direction))
                .bind(movement.item_id)
                .bind(movement.quantity)
                .bind(&movement.reason)
                .fetch_one(&mut *self.tx)
                .await;
        timer.record();

        Movement::try_from(result.map_err(store_error)?)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(store_error)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(store_error)
    }
}
