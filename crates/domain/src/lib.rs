//! Domain layer for the inventory ledger backend.
//!
//! This crate contains:
//! - Domain models (items, movements, audit events, stock tiers)
//! - The stock ledger engine and the audit recorder
//! - Storage ports implemented by the persistence crate
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::{LedgerError, StoreError};
