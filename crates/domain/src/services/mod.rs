//! Domain services for the inventory ledger.
//!
//! Services contain the ledger rules and depend on storage only through the
//! ports declared in [`store`].

pub mod audit;
pub mod history;
pub mod ledger;
pub mod memory;
pub mod reconciliation;
pub mod store;

pub use audit::{AuditOutcome, AuditRecorder, AuditSink, MockAuditSink};
pub use history::MovementHistory;
pub use ledger::{next_quantity, MovementResult, StockLedger, StockMovementRequest};
pub use memory::{InMemoryLedgerStore, InMemoryTransaction};
pub use reconciliation::reconcile;
pub use store::{ItemCatalog, LedgerStore, LedgerTransaction, MovementLog};
