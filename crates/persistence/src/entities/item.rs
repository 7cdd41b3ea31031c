//! Tool and material entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ItemKind, ItemSnapshot};
use rust_decimal::Decimal;
use shared::validation::QUANTITY_SCALE;
use sqlx::FromRow;

/// Database row mapping shared by the `tools` and `materials` tables.
///
/// The kind is implied by the table the row was read from.
#[derive(Debug, Clone, FromRow)]
pub struct ItemEntity {
    pub id: i64,
    pub name: String,
    pub initial_quantity: Decimal,
    pub current_quantity: Decimal,
    pub min_quantity: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postgres hands back a NUMERIC zero without its fractional digits.
pub(crate) fn stored_quantity(mut value: Decimal) -> Decimal {
    value.rescale(QUANTITY_SCALE);
    value
}

impl ItemEntity {
    /// Convert to domain model.
    pub fn into_domain(self, kind: ItemKind) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id,
            kind,
            name: self.name,
            initial_quantity: stored_quantity(self.initial_quantity),
            current_quantity: stored_quantity(self.current_quantity),
            min_quantity: stored_quantity(self.min_quantity),
            active: self.active,
        }
    }
}
