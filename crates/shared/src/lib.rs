//! Shared utilities and common types for the inventory ledger backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Quantity and reason validation shared by the ledger and its callers
//! - Opaque cursor encoding for restartable listings

pub mod pagination;
pub mod validation;
