//! Repository implementations of the domain storage ports.

pub mod audit_event;
pub mod catalog;
pub mod kind;
pub mod ledger;
pub mod movement;

pub use audit_event::AuditEventRepository;
pub use catalog::ItemCatalogRepository;
pub use kind::{movement_table, stock_table, Materials, StockTable, Tools};
pub use ledger::{PgLedgerStore, PgLedgerTransaction};
pub use movement::MovementRepository;

use domain::StoreError;

/// Maps a sqlx error onto the storage taxonomy.
///
/// Check constraint and foreign key violations become `Constraint`; pool
/// exhaustion and I/O failures become `Unavailable`.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.constraint().is_some() => {
            StoreError::Constraint(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Database(other),
    }
}
