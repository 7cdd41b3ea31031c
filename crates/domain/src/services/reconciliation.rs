//! Checks an item's running quantity against its movement log.

use super::audit::{AuditRecorder, AuditSink};
use super::store::{ItemCatalog, MovementLog};
use crate::error::LedgerError;
use crate::models::{
    AuditEvent, ItemId, ItemKind, Reconciliation, ReconciliationAudit, RequestContext,
};

/// Replays the movement log of one item against its initial quantity.
///
/// A mismatch is logged and recorded in the audit trail; it is reported in
/// the result, not as an error.
pub async fn reconcile<C, L, A>(
    catalog: &C,
    log: &L,
    recorder: &AuditRecorder<A>,
    kind: ItemKind,
    item_id: ItemId,
    context: &RequestContext,
) -> Result<Reconciliation, LedgerError>
where
    C: ItemCatalog + ?Sized,
    L: MovementLog + ?Sized,
    A: AuditSink,
{
    let item = catalog
        .get_item_snapshot(kind, item_id)
        .await?
        .ok_or(LedgerError::NotFound { kind, item_id })?;

    let totals = log.totals_for_item(kind, item_id).await?;
    let report = Reconciliation::from_totals(&item, totals);

    if !report.balanced {
        tracing::error!(
            kind = %kind,
            item_id,
            expected = %report.expected_quantity,
            current = %report.current_quantity,
            "Ledger reconciliation mismatch"
        );

        let event = AuditEvent::ReconciliationMismatch(ReconciliationAudit {
            item_kind: kind,
            item_id,
            item_name: item.name,
            expected_quantity: report.expected_quantity,
            current_quantity: report.current_quantity,
        });
        recorder.record(&event, None, context).await;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemSnapshot, NewItem};
    use crate::services::audit::MockAuditSink;
    use crate::services::ledger::{StockLedger, StockMovementRequest};
    use crate::services::memory::InMemoryLedgerStore;
    use crate::services::store::{LedgerStore, LedgerTransaction};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    async fn seeded() -> (StockLedger<InMemoryLedgerStore, MockAuditSink>, ItemSnapshot) {
        let ledger = StockLedger::new(InMemoryLedgerStore::new(), MockAuditSink::new());
        let item = ledger
            .store()
            .register_item(&NewItem::new(ItemKind::Tool, "Wrench", dec!(4.00), dec!(1.00)))
            .await
            .unwrap();

        for (quantity, stock_in) in [("6.00", true), ("2.50", false)] {
            let request = StockMovementRequest {
                kind: item.kind,
                item_id: item.id,
                quantity: quantity.to_string(),
                reason: None,
                actor_id: Uuid::new_v4(),
                context: RequestContext::internal(),
            };
            if stock_in {
                ledger.apply_stock_in(request).await.unwrap();
            } else {
                ledger.apply_stock_out(request).await.unwrap();
            }
        }
        (ledger, item)
    }

    #[tokio::test]
    async fn test_balanced_ledger() {
        let (ledger, item) = seeded().await;
        let store = ledger.store();

        let report = reconcile(
            store,
            store,
            ledger.recorder(),
            item.kind,
            item.id,
            &RequestContext::internal(),
        )
        .await
        .unwrap();

        assert!(report.balanced);
        assert_eq!(report.total_in, dec!(6.00));
        assert_eq!(report.total_out, dec!(2.50));
        assert_eq!(report.expected_quantity, dec!(7.50));
        assert_eq!(report.current_quantity, dec!(7.50));
        // Only the two movement events were audited.
        assert_eq!(ledger.recorder().sink().records().await.len(), 2);
    }

    #[tokio::test]
    async fn test_drift_is_reported_and_audited() {
        let (ledger, item) = seeded().await;
        let store = ledger.store();

        // Update the quantity without a matching movement.
        let mut tx = store.begin().await.unwrap();
        tx.set_current_quantity(item.kind, item.id, dec!(9.00))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let report = reconcile(
            store,
            store,
            ledger.recorder(),
            item.kind,
            item.id,
            &RequestContext::internal(),
        )
        .await
        .unwrap();

        assert!(!report.balanced);
        let records = ledger.recorder().sink().records().await;
        assert_eq!(records.len(), 3);
        assert!(records[2]
            .description
            .contains("movement log expects 7.50 but catalog holds 9.00"));
    }

    #[tokio::test]
    async fn test_unknown_item() {
        let store = InMemoryLedgerStore::new();
        let recorder = AuditRecorder::new(MockAuditSink::new());

        let err = reconcile(
            &store,
            &store,
            &recorder,
            ItemKind::Material,
            42,
            &RequestContext::internal(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, LedgerError::NotFound { item_id: 42, .. }));
    }
}
