//! Domain models for the inventory ledger.

pub mod audit_event;
pub mod item;
pub mod movement;
pub mod stock;

pub use audit_event::{
    AuditEvent, AuditRecord, NewAuditEvent, ReconciliationAudit, RequestContext,
    StockMovementAudit, INTERNAL_ORIGIN,
};
pub use item::{validate_stock_level, ItemId, ItemKind, ItemSnapshot, NewItem};
pub use movement::{
    replay, Direction, Movement, MovementPage, MovementTotals, NewMovement, Reconciliation,
};
pub use stock::{StockSlice, StockSummary, StockTier};
