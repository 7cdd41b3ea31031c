//! Item catalog repository for tools and materials.

use async_trait::async_trait;
use domain::models::{ItemId, ItemKind, ItemSnapshot, NewItem};
use domain::services::ItemCatalog;
use domain::StoreError;
use sqlx::PgPool;

use super::kind::stock_table;
use super::store_error;
use crate::entities::ItemEntity;
use crate::metrics::QueryTimer;

/// Repository for catalog rows the ledger reads and seeds.
#[derive(Clone)]
pub struct ItemCatalogRepository {
    pool: PgPool,
}

impl ItemCatalogRepository {
    /// Creates a new ItemCatalogRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemCatalog for ItemCatalogRepository {
    async fn register_item(&self, item: &NewItem) -> Result<ItemSnapshot, StoreError> {
        item.validate()
            .map_err(|e| StoreError::Constraint(e.code.into_owned()))?;

        let table = stock_table(item.kind);
        let timer = QueryTimer::new("register_item");
        let result = sqlx::query_as::<_, ItemEntity>(&table.insert_item_sql())
            .bind(item.name.trim())
            .bind(item.initial_quantity)
            .bind(item.min_quantity)
            .fetch_one(&self.pool)
            .await;
        timer.record();

        let entity = result.map_err(store_error)?;
        tracing::info!(kind = %item.kind, item_id = entity.id, "Item registered");
        Ok(entity.into_domain(item.kind))
    }

    async fn deactivate_item(&self, kind: ItemKind, item_id: ItemId) -> Result<bool, StoreError> {
        let timer = QueryTimer::new("deactivate_item");
        let result = sqlx::query(&stock_table(kind).deactivate_sql())
            .bind(item_id)
            .execute(&self.pool)
            .await;
        timer.record();

        Ok(result.map_err(store_error)?.rows_affected() > 0)
    }

    async fn get_item_snapshot(
        &self,
        kind: ItemKind,
        item_id: ItemId,
    ) -> Result<Option<ItemSnapshot>, StoreError> {
        let timer = QueryTimer::new("get_item_snapshot");
        let result = sqlx::query_as::<_, ItemEntity>(&stock_table(kind).select_item_sql(false))
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .map(|entity| entity.into_domain(kind)))
    }

    async fn list_stock_levels(&self, kind: ItemKind) -> Result<Vec<ItemSnapshot>, StoreError> {
        let timer = QueryTimer::new("list_stock_levels");
        let result = sqlx::query_as::<_, ItemEntity>(&stock_table(kind).list_active_sql())
            .fetch_all(&self.pool)
            .await;
        timer.record();

        Ok(result
            .map_err(store_error)?
            .into_iter()
            .map(|entity| entity.into_domain(kind))
            .collect())
    }
}
