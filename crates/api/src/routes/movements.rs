//! Movement history endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::{ItemId, Movement, MovementPage};
use domain::services::{ItemCatalog, MovementHistory, MovementLog};
use domain::LedgerError;
use serde::{Deserialize, Serialize};
use shared::pagination::{clamp_page_size, Cursor};

use super::item_kind;
use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for one item's movement history.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for the recent-movements listing.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecentMovementsResponse {
    pub movements: Vec<Movement>,
}

/// List an item's movements, newest first.
///
/// GET /api/v1/inventory/:kind/:item_id/movements?cursor=<token>&limit=<n>
pub async fn list_item_movements(
    State(state): State<AppState>,
    Path((collection, item_id)): Path<(String, ItemId)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<MovementPage>, ApiError> {
    let kind = item_kind(&collection)?;

    let cursor = query
        .cursor
        .as_deref()
        .map(Cursor::decode)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    // Unknown items get a 404 rather than an empty history.
    if state.catalog.get_item_snapshot(kind, item_id).await?.is_none() {
        return Err(LedgerError::NotFound { kind, item_id }.into());
    }

    let page_size = clamp_page_size(query.limit, state.config.ledger.default_page_size);
    let mut history = MovementHistory::new(&state.movements, kind, item_id, page_size);
    if let Some(cursor) = cursor {
        history = history.starting_after(cursor);
    }

    Ok(Json(history.next_movement_page().await?))
}

/// List the most recent movements across tools and materials.
///
/// GET /api/v1/inventory/movements/recent?limit=<n>
pub async fn list_recent_movements(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentMovementsResponse>, ApiError> {
    let limit = state.config.ledger.recent_limit(query.limit);
    let movements = state.movements.list_recent(limit).await?;

    Ok(Json(RecentMovementsResponse { movements }))
}
