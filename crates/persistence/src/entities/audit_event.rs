//! Audit event entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AuditRecord;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the audit_events table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEventEntity {
    pub id: i64,
    pub description: String,
    pub actor_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl From<AuditEventEntity> for AuditRecord {
    fn from(entity: AuditEventEntity) -> Self {
        AuditRecord {
            id: entity.id,
            description: entity.description,
            actor_id: entity.actor_id,
            occurred_at: entity.occurred_at,
        }
    }
}
