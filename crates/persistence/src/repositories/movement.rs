//! Movement log repository (read side).
//!
//! Stock-in rows live in `stock_entries`, stock-out rows in `stock_exits`.
//! Both draw ids from one sequence, so `(occurred_at, id)` orders the merged
//! stream without ties.

use async_trait::async_trait;
use domain::models::{Direction, ItemId, ItemKind, Movement, MovementTotals};
use domain::services::MovementLog;
use domain::StoreError;
use rust_decimal::Decimal;
use shared::pagination::Cursor;
use sqlx::PgPool;

use super::kind::stock_table;
use super::store_error;
use crate::entities::item::stored_quantity;
use crate::entities::MovementEntity;
use crate::metrics::QueryTimer;

const RECENT_MOVEMENTS_SQL: &str = r#"
    SELECT id, item_id, item_kind, direction, quantity, reason, occurred_at
    FROM (
        SELECT id, COALESCE(tool_id, material_id) AS item_id,
               CASE WHEN tool_id IS NOT NULL THEN 'tool' ELSE 'material' END AS item_kind,
               'in'::text AS direction, quantity, reason, occurred_at
        FROM stock_entries
        UNION ALL
        SELECT id, COALESCE(tool_id, material_id) AS item_id,
               CASE WHEN tool_id IS NOT NULL THEN 'tool' ELSE 'material' END AS item_kind,
               'out'::text AS direction, quantity, reason, occurred_at
        FROM stock_exits
    ) movements
    ORDER BY occurred_at DESC, id DESC
    LIMIT $1
"#;

/// Repository for reading stock movements.
#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    /// Creates a new MovementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_movements(rows: Vec<MovementEntity>) -> Result<Vec<Movement>, StoreError> {
    rows.into_iter().map(Movement::try_from).collect()
}

#[async_trait]
impl MovementLog for MovementRepository {
    async fn list_for_item(
        &self,
        kind: ItemKind,
        item_id: ItemId,
        after: Option<Cursor>,
        limit: i64,
    ) -> Result<Vec<Movement>, StoreError> {
        let table = stock_table(kind);
        let sql = format!(
            r#"
            SELECT id, item_id, item_kind, direction, quantity, reason, occurred_at
            FROM ({} UNION ALL {}) movements
            WHERE ($2::timestamptz IS NULL OR (occurred_at, id) < ($2::timestamptz, $3::bigint))
            ORDER BY occurred_at DESC, id DESC
            LIMIT $4
            "#,
            table.movement_projection(Direction::In),
            table.movement_projection(Direction::Out)
        );

        let timer = QueryTimer::new("list_movements_for_item");
        let result = sqlx::query_as::<_, MovementEntity>(&sql)
            .bind(item_id)
            .bind(after.map(|c| c.occurred_at))
            .bind(after.map(|c| c.id))
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();

        into_movements(result.map_err(store_error)?)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Movement>, StoreError> {
        let timer = QueryTimer::new("list_recent_movements");
        let result = sqlx::query_as::<_, MovementEntity>(RECENT_MOVEMENTS_SQL)
            .bind(limit)
            .fetch_all(&self.pool)
            .await;
        timer.record();

        into_movements(result.map_err(store_error)?)
    }

    async fn totals_for_item(
        &self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<MovementTotals, StoreError> {
        let fk = stock_table(kind).movement_fk();
        let sql = format!(
            "SELECT \
                COALESCE((SELECT SUM(quantity) FROM stock_entries WHERE {fk} = $1), 0) AS total_in, \
                COALESCE((SELECT SUM(quantity) FROM stock_exits WHERE {fk} = $1), 0) AS total_out",
            fk = fk
        );

        let timer = QueryTimer::new("movement_totals_for_item");
        let result = sqlx::query_as::<_, (Decimal, Decimal)>(&sql)
            .bind(item_id)
            .fetch_one(&self.pool)
            .await;
        timer.record();

        let (total_in, total_out) = result.map_err(store_error)?;
        Ok(MovementTotals {
            total_in: stored_quantity(total_in),
            total_out: stored_quantity(total_out),
        })
    }
}
