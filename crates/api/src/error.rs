use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::LedgerError;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient stock: {available} available")]
    InsufficientStock { available: Decimal, requested: Decimal },

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<Decimal>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut available = None;
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::InsufficientStock {
                available: have,
                requested,
            } => {
                available = Some(*have);
                (
                    StatusCode::CONFLICT,
                    "insufficient_stock",
                    format!("Requested {} but only {} available", requested, have),
                )
            }
            ApiError::OutOfRange(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "out_of_range", msg.clone())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            available,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::InvalidArgument(msg) => ApiError::Validation(msg),
            LedgerError::NotFound { .. } => ApiError::NotFound(message),
            LedgerError::InsufficientStock {
                available,
                requested,
            } => ApiError::InsufficientStock {
                available,
                requested,
            },
            LedgerError::OutOfRange { .. } => ApiError::OutOfRange(message),
            LedgerError::Storage(e) => ApiError::Internal(format!("Storage failure: {}", e)),
        }
    }
}

impl From<domain::StoreError> for ApiError {
    fn from(err: domain::StoreError) -> Self {
        ApiError::from(LedgerError::from(err))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::ItemKind;
    use domain::StoreError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_argument_is_bad_request() {
        let error = ApiError::from(LedgerError::InvalidArgument("bad quantity".into()));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found() {
        let error = ApiError::from(LedgerError::NotFound {
            kind: ItemKind::Tool,
            item_id: 5,
        });
        assert_eq!(error.to_string(), "Not found: tool 5 not found");
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_insufficient_stock_is_conflict() {
        let error = ApiError::from(LedgerError::InsufficientStock {
            available: dec!(3.00),
            requested: dec!(10.00),
        });
        assert_eq!(error.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_out_of_range_is_unprocessable() {
        let error = ApiError::from(LedgerError::OutOfRange {
            current: dec!(99999999.00),
            requested: dec!(5.00),
            max: dec!(99999999.99),
        });
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_storage_failure_is_opaque() {
        let error = ApiError::from(LedgerError::Storage(StoreError::Unavailable(
            "connection reset".into(),
        )));
        assert!(matches!(error, ApiError::Internal(_)));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_unauthorized() {
        let error = ApiError::Unauthorized("missing actor".to_string());
        assert_eq!(error.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string())),
            "Validation error: test"
        );
        assert_eq!(
            format!("{}", ApiError::Internal("test".to_string())),
            "Internal error: test"
        );
    }
}
