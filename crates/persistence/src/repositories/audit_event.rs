//! Audit event repository for database operations.

use async_trait::async_trait;
use domain::models::{AuditRecord, NewAuditEvent};
use domain::services::AuditSink;
use domain::StoreError;
use sqlx::PgPool;

use super::store_error;
use crate::entities::AuditEventEntity;
use crate::metrics::{record_audit_write_failure, QueryTimer};

/// Repository for the audit trail.
#[derive(Clone)]
pub struct AuditEventRepository {
    pool: PgPool,
}

impl AuditEventRepository {
    /// Creates a new AuditEventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for AuditEventRepository {
    async fn append(&self, event: NewAuditEvent) -> Result<AuditRecord, StoreError> {
        let timer = QueryTimer::new("insert_audit_event");
        let result = sqlx::query_as::<_, AuditEventEntity>(
            r#"
            INSERT INTO audit_events (description, actor_id)
            VALUES ($1, $2)
            RETURNING id, description, actor_id, occurred_at
            "#,
        )
        .bind(&event.description)
        .bind(event.actor_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(entity) => Ok(entity.into()),
            Err(e) => {
                record_audit_write_failure();
                Err(store_error(e))
            }
        }
    }
}
