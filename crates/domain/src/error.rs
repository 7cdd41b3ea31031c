//! Error taxonomy for the stock ledger.

use rust_decimal::Decimal;
use thiserror::Error;
use validator::ValidationError;

use crate::models::{ItemId, ItemKind};

/// Failures raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Stored data is inconsistent: {0}")]
    Corrupt(String),
}

/// Errors returned by ledger operations.
///
/// Every variant except `Storage` is raised before any mutation and leaves
/// the item and its movement log untouched.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{kind} {item_id} not found")]
    NotFound { kind: ItemKind, item_id: ItemId },

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Quantity out of range: {current} + {requested} exceeds {max}")]
    OutOfRange {
        current: Decimal,
        requested: Decimal,
        max: Decimal,
    },

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl LedgerError {
    /// Short label used for metrics and structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidArgument(_) => "invalid_argument",
            LedgerError::NotFound { .. } => "not_found",
            LedgerError::InsufficientStock { .. } => "insufficient_stock",
            LedgerError::OutOfRange { .. } => "out_of_range",
            LedgerError::Storage(_) => "storage_failure",
        }
    }

    /// True for rejections the caller can fix by changing the request.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, LedgerError::Storage(_))
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        let message = err
            .message
            .map(|m| m.into_owned())
            .unwrap_or_else(|| err.code.into_owned());
        LedgerError::InvalidArgument(message)
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Storage(StoreError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_message() {
        let mut err = ValidationError::new("quantity_precision");
        err.message = Some("Quantity cannot have more than 2 decimal places".into());

        let ledger_err = LedgerError::from(err);

        assert!(matches!(
            ledger_err,
            LedgerError::InvalidArgument(ref m) if m.contains("2 decimal places")
        ));
        assert_eq!(ledger_err.code(), "invalid_argument");
    }

    #[test]
    fn test_validation_error_without_message_uses_code() {
        let err = LedgerError::from(ValidationError::new("quantity_required"));
        assert_eq!(err.to_string(), "Invalid argument: quantity_required");
    }

    #[test]
    fn test_rejections_are_not_storage_failures() {
        let not_found = LedgerError::NotFound {
            kind: ItemKind::Tool,
            item_id: 9,
        };
        assert!(not_found.is_rejection());
        assert_eq!(not_found.to_string(), "tool 9 not found");

        let storage = LedgerError::Storage(StoreError::Unavailable("down".into()));
        assert!(!storage.is_rejection());
        assert_eq!(storage.code(), "storage_failure");
    }
}
