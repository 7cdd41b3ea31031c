//! Table layout per item kind.
//!
//! Tools and materials live in separate catalog tables, and each movement
//! table carries one nullable foreign key per kind. [`StockTable`] hides
//! those differences so the repositories issue the same statements for
//! either kind.

use domain::models::{Direction, ItemKind};

const ITEM_COLUMNS: &str =
    "id, name, initial_quantity, current_quantity, min_quantity, active, created_at, updated_at";

/// Storage layout of one item kind.
pub trait StockTable: Send + Sync {
    fn kind(&self) -> ItemKind;

    /// Catalog table holding the running quantity.
    fn catalog(&self) -> &'static str;

    /// Foreign key column on `stock_entries` / `stock_exits`.
    fn movement_fk(&self) -> &'static str;

    fn select_item_sql(&self, for_update: bool) -> String {
        let mut sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            ITEM_COLUMNS,
            self.catalog()
        );
        if for_update {
            sql.push_str(" FOR UPDATE");
        }
        sql
    }

    fn list_active_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE active ORDER BY id",
            ITEM_COLUMNS,
            self.catalog()
        )
    }

    fn insert_item_sql(&self) -> String {
        format!(
            "INSERT INTO {} (name, initial_quantity, current_quantity, min_quantity) \
             VALUES ($1, $2, $2, $3) RETURNING {}",
            self.catalog(),
            ITEM_COLUMNS
        )
    }

    fn deactivate_sql(&self) -> String {
        format!(
            "UPDATE {} SET active = FALSE, updated_at = NOW() WHERE id = $1 AND active",
            self.catalog()
        )
    }

    fn set_quantity_sql(&self) -> String {
        format!(
            "UPDATE {} SET current_quantity = $2, updated_at = NOW() WHERE id = $1",
            self.catalog()
        )
    }

    /// Projection of one movement table onto the common movement row.
    fn movement_projection(&self, direction: Direction) -> String {
        format!(
            "SELECT id, {fk} AS item_id, '{kind}'::text AS item_kind, \
             '{direction}'::text AS direction, quantity, reason, occurred_at \
             FROM {table} WHERE {fk} = $1",
            fk = self.movement_fk(),
            kind = self.kind(),
            direction = direction,
            table = movement_table(direction)
        )
    }

    /// Stamps `occurred_at` with the insert time. `NOW()` would give the
    /// transaction start, which lags commit order once a transaction waits
    /// on the item lock.
    fn insert_movement_sql(&self, direction: Direction) -> String {
        format!(
            "INSERT INTO {table} ({fk}, quantity, reason, occurred_at) \
             VALUES ($1, $2, $3, clock_timestamp()) \
             RETURNING id, {fk} AS item_id, '{kind}'::text AS item_kind, \
             '{direction}'::text AS direction, quantity, reason, occurred_at",
            table = movement_table(direction),
            fk = self.movement_fk(),
            kind = self.kind(),
            direction = direction
        )
    }
}

/// `tools` table.
pub struct Tools;

/// `materials` table.
pub struct Materials;

impl StockTable for Tools {
    fn kind(&self) -> ItemKind {
        ItemKind::Tool
    }

    fn catalog(&self) -> &'static str {
        "tools"
    }

    fn movement_fk(&self) -> &'static str {
        "tool_id"
    }
}

impl StockTable for Materials {
    fn kind(&self) -> ItemKind {
        ItemKind::Material
    }

    fn catalog(&self) -> &'static str {
        "materials"
    }

    fn movement_fk(&self) -> &'static str {
        "material_id"
    }
}

/// Layout for a runtime kind.
pub fn stock_table(kind: ItemKind) -> &'static dyn StockTable {
    match kind {
        ItemKind::Tool => &Tools,
        ItemKind::Material => &Materials,
    }
}

/// Movement table for a direction.
pub fn movement_table(direction: Direction) -> &'static str {
    match direction {
        Direction::In => "stock_entries",
        Direction::Out => "stock_exits",
    }
}
