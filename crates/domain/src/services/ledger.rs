//! Stock ledger engine.
//!
//! Applies stock-in and stock-out movements to tools and materials. Each call
//! validates the quantity, then reads the item, checks the stock rules,
//! updates the running quantity and appends a movement inside one store
//! transaction. The audit event is recorded only after that transaction
//! commits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::validation::{max_quantity, normalize_reason, parse_quantity};
use uuid::Uuid;

use super::audit::{AuditRecorder, AuditSink};
use super::store::{LedgerStore, LedgerTransaction};
use crate::error::LedgerError;
use crate::models::{
    AuditEvent, Direction, ItemId, ItemKind, ItemSnapshot, Movement, NewMovement,
    RequestContext, StockMovementAudit,
};

/// A caller's request to move stock for one item.
#[derive(Debug, Clone)]
pub struct StockMovementRequest {
    pub kind: ItemKind,
    pub item_id: ItemId,
    /// Raw quantity text as supplied by the caller.
    pub quantity: String,
    pub reason: Option<String>,
    pub actor_id: Uuid,
    pub context: RequestContext,
}

/// Outcome of a committed movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementResult {
    pub movement_id: i64,
    pub item_id: ItemId,
    pub item_kind: ItemKind,
    pub item_name: String,
    pub direction: Direction,
    pub previous_quantity: Decimal,
    /// Signed change: negative for stock-out.
    pub delta: Decimal,
    pub new_quantity: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Computes the quantity an item would hold after a movement.
pub fn next_quantity(
    direction: Direction,
    current: Decimal,
    quantity: Decimal,
) -> Result<Decimal, LedgerError> {
    match direction {
        Direction::In => {
            let candidate = current + quantity;
            let max = max_quantity();
            if candidate > max {
                return Err(LedgerError::OutOfRange {
                    current,
                    requested: quantity,
                    max,
                });
            }
            Ok(candidate)
        }
        Direction::Out => {
            let candidate = current - quantity;
            if candidate < Decimal::ZERO {
                return Err(LedgerError::InsufficientStock {
                    available: current,
                    requested: quantity,
                });
            }
            Ok(candidate)
        }
    }
}

/// Stock ledger over a transactional store and an audit sink.
pub struct StockLedger<S, A> {
    store: S,
    recorder: AuditRecorder<A>,
}

impl<S, A> StockLedger<S, A>
where
    S: LedgerStore,
    A: AuditSink,
{
    pub fn new(store: S, audit_sink: A) -> Self {
        Self {
            store,
            recorder: AuditRecorder::new(audit_sink),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn recorder(&self) -> &AuditRecorder<A> {
        &self.recorder
    }

    /// Adds stock to an item.
    pub async fn apply_stock_in(
        &self,
        request: StockMovementRequest,
    ) -> Result<MovementResult, LedgerError> {
        self.apply(Direction::In, request).await
    }

    /// Removes stock from an item. Never leaves the quantity negative.
    pub async fn apply_stock_out(
        &self,
        request: StockMovementRequest,
    ) -> Result<MovementResult, LedgerError> {
        self.apply(Direction::Out, request).await
    }

    #[tracing::instrument(
        skip(self, direction, request),
        fields(kind = %request.kind, item_id = request.item_id, direction = %direction)
    )]
    async fn apply(
        &self,
        direction: Direction,
        request: StockMovementRequest,
    ) -> Result<MovementResult, LedgerError> {
        // Input errors are raised before any storage access.
        let (quantity, reason) = match parse_request(&request) {
            Ok(parsed) => parsed,
            Err(err) => {
                log_failure(&err);
                return Err(err);
            }
        };

        let mut tx = self.store.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to open ledger transaction");
            LedgerError::from(e)
        })?;

        let staged = stage_movement(&mut tx, &request, direction, quantity, reason).await;

        let (item, movement, new_quantity) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "Ledger rollback failed");
                }
                log_failure(&err);
                return Err(err);
            }
        };

        if let Err(e) = tx.commit().await {
            let err = LedgerError::from(e);
            log_failure(&err);
            return Err(err);
        }

        let result = MovementResult {
            movement_id: movement.id,
            item_id: item.id,
            item_kind: item.kind,
            item_name: item.name.clone(),
            direction,
            previous_quantity: item.current_quantity,
            delta: direction.signed(movement.quantity),
            new_quantity,
            occurred_at: movement.occurred_at,
        };

        tracing::info!(
            movement_id = result.movement_id,
            item_name = %result.item_name,
            previous = %result.previous_quantity,
            delta = %result.delta,
            new = %result.new_quantity,
            "Stock movement applied"
        );

        let payload = StockMovementAudit {
            item_kind: item.kind,
            item_id: item.id,
            item_name: item.name,
            quantity: movement.quantity,
            previous_quantity: result.previous_quantity,
            new_quantity,
            reason: movement.reason,
        };
        let event = match direction {
            Direction::In => AuditEvent::StockIn(payload),
            Direction::Out => AuditEvent::StockOut(payload),
        };
        // The outcome is logged by the recorder; the movement stands either way.
        self.recorder
            .record(&event, Some(request.actor_id), &request.context)
            .await;

        Ok(result)
    }
}

fn parse_request(request: &StockMovementRequest) -> Result<(Decimal, String), LedgerError> {
    let quantity = parse_quantity(&request.quantity)?;
    let reason = normalize_reason(request.reason.as_deref())?;
    Ok((quantity, reason))
}

/// Reads, checks and writes one movement inside `tx` without committing.
async fn stage_movement<T: LedgerTransaction>(
    tx: &mut T,
    request: &StockMovementRequest,
    direction: Direction,
    quantity: Decimal,
    reason: String,
) -> Result<(ItemSnapshot, Movement, Decimal), LedgerError> {
    let item = tx
        .lock_item(request.kind, request.item_id)
        .await?
        .filter(|item| item.active)
        .ok_or(LedgerError::NotFound {
            kind: request.kind,
            item_id: request.item_id,
        })?;

    let new_quantity = next_quantity(direction, item.current_quantity, quantity)?;

    tx.set_current_quantity(request.kind, request.item_id, new_quantity)
        .await?;

    let movement = tx
        .append_movement(&NewMovement {
            item_id: request.item_id,
            item_kind: request.kind,
            direction,
            quantity,
            reason,
        })
        .await?;

    Ok((item, movement, new_quantity))
}

fn log_failure(err: &LedgerError) {
    if err.is_rejection() {
        tracing::warn!(reason = err.code(), error = %err, "Stock movement rejected");
    } else {
        tracing::error!(error = %err, "Stock movement failed");
    }
}
