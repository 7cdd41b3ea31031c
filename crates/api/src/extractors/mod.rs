//! Custom Axum extractors.
//!
//! Extractors for the caller identity and request origin handed to the ledger.

pub mod actor;
pub mod request_context;

pub use actor::{Actor, ACTOR_ID_HEADER};
pub use request_context::LedgerContext;
