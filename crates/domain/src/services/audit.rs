//! Audit recorder.
//!
//! Writes a rendered description of each completed mutation to the audit
//! trail. Failures are logged and returned as [`AuditOutcome::Failed`]; they
//! never reach the caller of the operation that triggered them.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{AuditEvent, AuditRecord, NewAuditEvent, RequestContext};

/// Destination for audit rows.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, event: NewAuditEvent) -> Result<AuditRecord, StoreError>;
}

/// Result of an audit write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Row written with the given id.
    Recorded(i64),
    /// Write failed; the triggering operation is unaffected.
    Failed(String),
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded(_))
    }
}

/// Renders audit events and hands them to a sink.
#[derive(Debug, Clone)]
pub struct AuditRecorder<A> {
    sink: A,
}

impl<A: AuditSink> AuditRecorder<A> {
    pub fn new(sink: A) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    /// Records `event`. Never returns an error.
    pub async fn record(
        &self,
        event: &AuditEvent,
        actor_id: Option<Uuid>,
        context: &RequestContext,
    ) -> AuditOutcome {
        let new_event = NewAuditEvent {
            description: event.describe(actor_id, context),
            actor_id,
        };

        match self.sink.append(new_event).await {
            Ok(record) => {
                tracing::debug!(
                    audit_id = record.id,
                    action = event.action(),
                    "Audit event recorded"
                );
                AuditOutcome::Recorded(record.id)
            }
            Err(e) => {
                tracing::error!(
                    action = event.action(),
                    actor_id = ?actor_id,
                    error = %e,
                    "Failed to record audit event"
                );
                AuditOutcome::Failed(e.to_string())
            }
        }
    }
}

/// In-memory audit sink for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockAuditSink {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose every write fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            records: Arc::default(),
        }
    }

    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn append(&self, event: NewAuditEvent) -> Result<AuditRecord, StoreError> {
        if self.simulate_failure {
            tracing::warn!("Mock audit sink simulating failure");
            return Err(StoreError::Unavailable("Simulated failure".to_string()));
        }

        let mut records = self.records.lock().await;
        let record = AuditRecord {
            id: records.len() as i64 + 1,
            description: event.description,
            actor_id: event.actor_id,
            occurred_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemKind, ReconciliationAudit};
    use rust_decimal_macros::dec;

    fn mismatch() -> AuditEvent {
        AuditEvent::ReconciliationMismatch(ReconciliationAudit {
            item_kind: ItemKind::Material,
            item_id: 4,
            item_name: "Rebar".to_string(),
            expected_quantity: dec!(12.00),
            current_quantity: dec!(11.50),
        })
    }

    #[tokio::test]
    async fn test_record_persists_rendered_description() {
        let recorder = AuditRecorder::new(MockAuditSink::new());
        let actor = Uuid::new_v4();

        let outcome = recorder
            .record(&mismatch(), Some(actor), &RequestContext::internal())
            .await;

        assert_eq!(outcome, AuditOutcome::Recorded(1));
        let records = recorder.sink().records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor_id, Some(actor));
        assert!(records[0]
            .description
            .starts_with("[ledger.reconciliation_mismatch]"));
        assert!(records[0].description.contains("origin: internal"));
    }

    #[tokio::test]
    async fn test_record_swallows_sink_failure() {
        let recorder = AuditRecorder::new(MockAuditSink::failing());

        let outcome = recorder
            .record(&mismatch(), None, &RequestContext::internal())
            .await;

        assert!(!outcome.is_recorded());
        assert!(matches!(outcome, AuditOutcome::Failed(ref m) if m.contains("Simulated")));
        assert!(recorder.sink().records().await.is_empty());
    }
}
