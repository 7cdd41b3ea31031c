//! Stock-in and stock-out endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{Direction, ItemId, ItemKind};
use domain::services::{MovementResult, StockMovementRequest};
use domain::LedgerError;
use serde::Deserialize;
use serde_json::Value;

use super::item_kind;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{Actor, LedgerContext};
use crate::middleware::metrics::{record_movement_rejection, record_stock_movement};

/// Body of a stock movement request.
///
/// `quantity` may be sent as a JSON string or number; either way it is
/// validated as decimal text by the ledger.
#[derive(Debug, Deserialize)]
pub struct StockMovementBody {
    pub quantity: Option<Value>,
    pub reason: Option<String>,
}

/// Turns the JSON quantity into the text the ledger parses.
fn quantity_text(value: Option<Value>) -> Result<String, ApiError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(_) => Err(ApiError::Validation(
            "Quantity must be a string or a number".to_string(),
        )),
    }
}

/// Add stock to an item.
///
/// POST /api/v1/inventory/:kind/:item_id/stock-in
pub async fn stock_in(
    State(state): State<AppState>,
    Path((collection, item_id)): Path<(String, ItemId)>,
    actor: Actor,
    context: LedgerContext,
    Json(body): Json<StockMovementBody>,
) -> Result<Json<MovementResult>, ApiError> {
    apply(state, Direction::In, &collection, item_id, actor, context, body).await
}

/// Remove stock from an item.
///
/// POST /api/v1/inventory/:kind/:item_id/stock-out
pub async fn stock_out(
    State(state): State<AppState>,
    Path((collection, item_id)): Path<(String, ItemId)>,
    actor: Actor,
    context: LedgerContext,
    Json(body): Json<StockMovementBody>,
) -> Result<Json<MovementResult>, ApiError> {
    apply(state, Direction::Out, &collection, item_id, actor, context, body).await
}

async fn apply(
    state: AppState,
    direction: Direction,
    collection: &str,
    item_id: ItemId,
    Actor(actor_id): Actor,
    LedgerContext(context): LedgerContext,
    body: StockMovementBody,
) -> Result<Json<MovementResult>, ApiError> {
    let kind = item_kind(collection)?;
    let quantity = quantity_text(body.quantity)?;

    let request = StockMovementRequest {
        kind,
        item_id,
        quantity,
        reason: body.reason,
        actor_id,
        context,
    };

    let outcome = match direction {
        Direction::In => state.ledger.apply_stock_in(request).await,
        Direction::Out => state.ledger.apply_stock_out(request).await,
    };

    match outcome {
        Ok(result) => {
            record_stock_movement(kind, direction);
            Ok(Json(result))
        }
        Err(err) => {
            count_rejection(kind, &err);
            Err(err.into())
        }
    }
}

fn count_rejection(kind: ItemKind, err: &LedgerError) {
    if err.is_rejection() {
        record_movement_rejection(kind, err.code());
    }
}
