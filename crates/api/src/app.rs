use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::StockLedger;
use persistence::repositories::{
    AuditEventRepository, ItemCatalogRepository, MovementRepository, PgLedgerStore,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, movements, stats, stock};

/// Ledger wired to PostgreSQL and the audit table.
pub type PgStockLedger = StockLedger<PgLedgerStore, AuditEventRepository>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub ledger: Arc<PgStockLedger>,
    pub catalog: ItemCatalogRepository,
    pub movements: MovementRepository,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let ledger = StockLedger::new(
            PgLedgerStore::new(pool.clone()),
            AuditEventRepository::new(pool.clone()),
        );

        Self {
            catalog: ItemCatalogRepository::new(pool.clone()),
            movements: MovementRepository::new(pool.clone()),
            ledger: Arc::new(ledger),
            config: Arc::new(config),
            pool,
        }
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let state = AppState::new(config, pool);
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    // Upstream gateway authenticates; any origin may call through it.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let inventory_routes = Router::new()
        .route(
            "/api/v1/inventory/movements/recent",
            get(movements::list_recent_movements),
        )
        .route(
            "/api/v1/inventory/:kind/stock-summary",
            get(stats::stock_summary),
        )
        .route(
            "/api/v1/inventory/:kind/:item_id/stock-in",
            post(stock::stock_in),
        )
        .route(
            "/api/v1/inventory/:kind/:item_id/stock-out",
            post(stock::stock_out),
        )
        .route(
            "/api/v1/inventory/:kind/:item_id/movements",
            get(movements::list_item_movements),
        )
        .route(
            "/api/v1/inventory/:kind/:item_id/reconciliation",
            get(stats::reconciliation),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(inventory_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
