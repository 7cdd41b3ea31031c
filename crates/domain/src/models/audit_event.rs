//! Audit trail ("bitácora") domain models.
//!
//! Each event kind carries its own payload and renders to a single
//! human-readable line. The rendered text is what gets persisted; the
//! trail is diagnostic and never consulted by the ledger itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::net::IpAddr;
use uuid::Uuid;

use super::item::{ItemId, ItemKind};

/// Origin label used when a request carries no network address.
pub const INTERNAL_ORIGIN: &str = "internal";

/// Payload shared by stock-in and stock-out events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovementAudit {
    pub item_kind: ItemKind,
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: Decimal,
    pub previous_quantity: Decimal,
    pub new_quantity: Decimal,
    pub reason: String,
}

/// Payload for a failed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationAudit {
    pub item_kind: ItemKind,
    pub item_id: ItemId,
    pub item_name: String,
    pub expected_quantity: Decimal,
    pub current_quantity: Decimal,
}

/// Every event the audit trail knows how to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    StockIn(StockMovementAudit),
    StockOut(StockMovementAudit),
    ReconciliationMismatch(ReconciliationAudit),
}

impl AuditEvent {
    /// Action identifier in `resource.operation` form.
    pub fn action(&self) -> &'static str {
        match self {
            AuditEvent::StockIn(_) => "stock.in",
            AuditEvent::StockOut(_) => "stock.out",
            AuditEvent::ReconciliationMismatch(_) => "ledger.reconciliation_mismatch",
        }
    }

    /// Renders the event-specific part of the description.
    pub fn render(&self) -> String {
        match self {
            AuditEvent::StockIn(p) => format!(
                "Stock in: {} #{} \"{}\" +{} ({} → {}), reason: {}",
                p.item_kind,
                p.item_id,
                p.item_name,
                p.quantity,
                p.previous_quantity,
                p.new_quantity,
                p.reason
            ),
            AuditEvent::StockOut(p) => format!(
                "Stock out: {} #{} \"{}\" -{} ({} → {}), reason: {}",
                p.item_kind,
                p.item_id,
                p.item_name,
                p.quantity,
                p.previous_quantity,
                p.new_quantity,
                p.reason
            ),
            AuditEvent::ReconciliationMismatch(p) => format!(
                "Reconciliation mismatch: {} #{} \"{}\" movement log expects {} but catalog holds {}",
                p.item_kind, p.item_id, p.item_name, p.expected_quantity, p.current_quantity
            ),
        }
    }

    /// Full one-line description: action, rendered payload, actor and origin.
    pub fn describe(&self, actor_id: Option<Uuid>, context: &RequestContext) -> String {
        let actor = actor_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "system".to_string());

        let mut line = format!(
            "[{}] {} | actor: {} | origin: {}",
            self.action(),
            self.render(),
            actor,
            context.origin_label()
        );
        if let Some(request_id) = &context.request_id {
            line.push_str(" | request: ");
            line.push_str(request_id);
        }
        line
    }
}

/// Where a request came from, as reported by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub origin: Option<IpAddr>,
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Context for calls that did not arrive over the network.
    pub fn internal() -> Self {
        Self::default()
    }

    pub fn new(origin: Option<IpAddr>, request_id: Option<String>) -> Self {
        Self { origin, request_id }
    }

    pub fn origin_label(&self) -> String {
        self.origin
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| INTERNAL_ORIGIN.to_string())
    }
}

/// Row about to be written to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEvent {
    pub description: String,
    pub actor_id: Option<Uuid>,
}

/// Persisted audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: i64,
    pub description: String,
    pub actor_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}
