//! Stock statistics and reconciliation endpoint handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{ItemId, ItemKind, Reconciliation, StockSlice, StockSummary};
use domain::services::{reconcile, ItemCatalog};
use serde::Serialize;

use super::item_kind;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::LedgerContext;

/// Stock tier counts for one kind of item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummaryResponse {
    pub kind: ItemKind,
    pub total: u64,
    pub summary: StockSummary,
    pub slices: [StockSlice; 3],
}

/// Count active items per stock tier.
///
/// GET /api/v1/inventory/:kind/stock-summary
pub async fn stock_summary(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<StockSummaryResponse>, ApiError> {
    let kind = item_kind(&collection)?;
    let levels = state.catalog.list_stock_levels(kind).await?;
    let summary = StockSummary::from_levels(&levels);

    Ok(Json(StockSummaryResponse {
        kind,
        total: summary.total(),
        slices: summary.slices(),
        summary,
    }))
}

/// Replay an item's movement log and compare it with its running quantity.
///
/// GET /api/v1/inventory/:kind/:item_id/reconciliation
pub async fn reconciliation(
    State(state): State<AppState>,
    Path((collection, item_id)): Path<(String, ItemId)>,
    LedgerContext(context): LedgerContext,
) -> Result<Json<Reconciliation>, ApiError> {
    let kind = item_kind(&collection)?;
    let report = reconcile(
        &state.catalog,
        &state.movements,
        state.ledger.recorder(),
        kind,
        item_id,
        &context,
    )
    .await?;

    Ok(Json(report))
}
