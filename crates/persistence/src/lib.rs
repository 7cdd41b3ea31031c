//! Persistence layer for the inventory ledger.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain storage ports
//! - Query metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
