//! Stock movement entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Direction, ItemKind, Movement};
use domain::StoreError;
use rust_decimal::Decimal;
use sqlx::FromRow;

use super::item::stored_quantity;

/// Row produced by the movement queries.
///
/// `stock_entries` and `stock_exits` are read through one projection that
/// adds the item kind and direction as text columns.
#[derive(Debug, Clone, FromRow)]
pub struct MovementEntity {
    pub id: i64,
    pub item_id: i64,
    pub item_kind: String,
    pub direction: String,
    pub quantity: Decimal,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl TryFrom<MovementEntity> for Movement {
    type Error = StoreError;

    fn try_from(entity: MovementEntity) -> Result<Self, Self::Error> {
        let item_kind = entity
            .item_kind
            .parse::<ItemKind>()
            .map_err(StoreError::Corrupt)?;
        let direction = entity
            .direction
            .parse::<Direction>()
            .map_err(StoreError::Corrupt)?;

        Ok(Movement {
            id: entity.id,
            item_id: entity.item_id,
            item_kind,
            direction,
            quantity: stored_quantity(entity.quantity),
            reason: entity.reason,
            occurred_at: entity.occurred_at,
        })
    }
}
