//! Integration tests for the inventory ledger endpoints.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable to run these tests.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    deactivate_item, get_request, item_url, json_request, movement_count, parse_response_body,
    seed_item, setup, snapshot,
};
use domain::models::{replay, Direction, ItemKind, NewMovement, RequestContext};
use domain::services::{
    LedgerStore, LedgerTransaction, MovementLog, StockLedger, StockMovementRequest,
};
use persistence::repositories::{AuditEventRepository, MovementRepository, PgLedgerStore};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn test_stock_in_updates_quantity_and_records_movement() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(10.00), dec!(5.00)).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-in"),
            Uuid::new_v4(),
            json!({"quantity": "5.50", "reason": "restock"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["previousQuantity"], "10.00");
    assert_eq!(body["delta"], "5.50");
    assert_eq!(body["newQuantity"], "15.50");
    assert_eq!(body["itemName"], item.name.as_str());
    assert_eq!(body["direction"], "in");

    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(15.50));
    assert_eq!(movement_count(&pool, &item).await, 1);
}

#[tokio::test]
async fn test_stock_movement_writes_audit_row_for_actor() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(4.00), dec!(1.00)).await;
    let actor = Uuid::new_v4();

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-out"),
            actor,
            json!({"quantity": "1.50", "reason": "site work"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let descriptions: Vec<String> =
        sqlx::query_scalar("SELECT description FROM audit_events WHERE actor_id = $1")
            .bind(actor)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(descriptions.len(), 1);
    assert!(descriptions[0].starts_with("[stock.out] Stock out: tool #"));
    assert!(descriptions[0].contains(item.name.as_str()));
    assert!(descriptions[0].contains("(4.00 → 2.50)"));
}

#[tokio::test]
async fn test_stock_in_accepts_numeric_quantity() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Material, dec!(0.00), dec!(0.00)).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-in"),
            Uuid::new_v4(),
            json!({"quantity": 20}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["previousQuantity"], "0.00");
    assert_eq!(body["newQuantity"], "20.00");
}

#[tokio::test]
async fn test_stock_out_insufficient_stock_leaves_state_unchanged() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Material, dec!(3.00), dec!(5.00)).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-out"),
            Uuid::new_v4(),
            json!({"quantity": "10.00"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["available"], "3.00");

    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(3.00));
    assert_eq!(movement_count(&pool, &item).await, 0);
}

#[tokio::test]
async fn test_over_precise_quantity_is_rejected() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(1.00), dec!(0.00)).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-in"),
            Uuid::new_v4(),
            json!({"quantity": "5.123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");

    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(1.00));
    assert_eq!(movement_count(&pool, &item).await, 0);
}

#[tokio::test]
async fn test_stock_in_beyond_maximum_is_out_of_range() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(99999999.00), dec!(0.00)).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-in"),
            Uuid::new_v4(),
            json!({"quantity": "1.00"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(99999999.00));
}

#[tokio::test]
async fn test_deactivated_item_is_not_found() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(4.00), dec!(1.00)).await;
    deactivate_item(&pool, &item).await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-out"),
            Uuid::new_v4(),
            json!({"quantity": "1.00"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(movement_count(&pool, &item).await, 0);
}

#[tokio::test]
async fn test_wrong_kind_is_not_found() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(4.00), dec!(1.00)).await;

    // Same id, other catalog: the material table may hold an unrelated row,
    // so use an id no material has.
    let response = app
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/inventory/materials/{}/stock-in", i64::MAX),
            Uuid::new_v4(),
            json!({"quantity": "1.00"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(4.00));
}

#[tokio::test]
async fn test_missing_actor_is_unauthorized() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(4.00), dec!(1.00)).await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri(item_url(&item, "stock-in"))
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from(json!({"quantity": "1.00"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(movement_count(&pool, &item).await, 0);
}

#[tokio::test]
async fn test_sequential_movements_page_and_reconcile() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Material, dec!(0.00), dec!(1.00)).await;
    let actor = Uuid::new_v4();

    for (action, quantity) in [("stock-in", "20.00"), ("stock-out", "7.25"), ("stock-in", "1.00")] {
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                &item_url(&item, action),
                actor,
                json!({"quantity": quantity}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(13.75));

    // Test config uses a page size of two.
    let response = app
        .clone()
        .oneshot(get_request(&item_url(&item, "movements")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = parse_response_body(response).await;
    let movements = first["movements"].as_array().unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["quantity"], "1.00");
    assert_eq!(movements[1]["direction"], "out");
    let cursor = first["nextCursor"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "{}?cursor={}",
            item_url(&item, "movements"),
            cursor
        )))
        .await
        .unwrap();
    let second = parse_response_body(response).await;
    let movements = second["movements"].as_array().unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0]["quantity"], "20.00");
    assert!(second["nextCursor"].is_null());

    let response = app
        .oneshot(get_request(&item_url(&item, "reconciliation")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = parse_response_body(response).await;
    assert_eq!(report["expectedQuantity"], "13.75");
    assert_eq!(report["balanced"], true);
}

#[tokio::test]
async fn test_invalid_cursor_is_bad_request() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(1.00), dec!(0.00)).await;

    let response = app
        .oneshot(get_request(&format!(
            "{}?cursor=not-a-cursor",
            item_url(&item, "movements")
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recent_movements_include_new_movement() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(0.00), dec!(0.00)).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &item_url(&item, "stock-in"),
            Uuid::new_v4(),
            json!({"quantity": "2.00"}),
        ))
        .await
        .unwrap();
    let movement_id = parse_response_body(response).await["movementId"].clone();

    let response = app
        .oneshot(get_request("/api/v1/inventory/movements/recent?limit=100"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    let movements = body["movements"].as_array().unwrap();
    assert!(movements.len() <= 100);
    assert!(movements.iter().any(|m| m["id"] == movement_id));
}

#[tokio::test]
async fn test_stock_summary_counts_tiers() {
    let (pool, app) = setup().await;
    seed_item(&pool, ItemKind::Material, dec!(0.00), dec!(2.00)).await;

    let response = app
        .oneshot(get_request("/api/v1/inventory/materials/stock-summary"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["kind"], "material");
    assert!(body["summary"]["critical"].as_u64().unwrap() >= 1);
    assert_eq!(body["slices"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_collection_is_not_found() {
    let (_pool, app) = setup().await;

    let response = app
        .oneshot(get_request("/api/v1/inventory/projects/stock-summary"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let (_pool, app) = setup().await;

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_stock_outs_never_oversell() {
    let (pool, app) = setup().await;
    let item = seed_item(&pool, ItemKind::Material, dec!(10.00), dec!(2.00)).await;
    let actor = Uuid::new_v4();

    let mut handles = Vec::new();
    for _ in 0..30 {
        let app = app.clone();
        let uri = item_url(&item, "stock-out");
        handles.push(tokio::spawn(async move {
            app.oneshot(json_request(
                Method::POST,
                &uri,
                actor,
                json!({"quantity": "1.00"}),
            ))
            .await
            .unwrap()
            .status()
        }));
    }

    let mut applied = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => applied += 1,
            StatusCode::CONFLICT => rejected += 1,
            other => panic!("unexpected status: {other}"),
        }
    }
    assert_eq!(applied, 10);
    assert_eq!(rejected, 20);

    let after = snapshot(&pool, &item).await;
    assert_eq!(after.current_quantity, dec!(0.00));
    assert_eq!(movement_count(&pool, &item).await, 10);

    let movements = MovementRepository::new(pool.clone())
        .list_for_item(item.kind, item.id, None, 100)
        .await
        .unwrap();
    assert_eq!(replay(item.initial_quantity, &movements), after.current_quantity);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_history_follows_commit_order_for_overlapping_transactions() {
    let (pool, _app) = setup().await;
    let item = seed_item(&pool, ItemKind::Tool, dec!(10.00), dec!(1.00)).await;
    let store = PgLedgerStore::new(pool.clone());

    // First transaction opens, then idles while a second movement commits.
    let mut first = store.begin().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let ledger = StockLedger::new(
        PgLedgerStore::new(pool.clone()),
        AuditEventRepository::new(pool.clone()),
    );
    ledger
        .apply_stock_out(StockMovementRequest {
            kind: item.kind,
            item_id: item.id,
            quantity: "1.00".to_string(),
            reason: Some("committed first".to_string()),
            actor_id: Uuid::new_v4(),
            context: RequestContext::internal(),
        })
        .await
        .unwrap();

    let locked = first
        .lock_item(item.kind, item.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(locked.current_quantity, dec!(9.00));
    first
        .set_current_quantity(item.kind, item.id, dec!(8.00))
        .await
        .unwrap();
    first
        .append_movement(&NewMovement {
            item_id: item.id,
            item_kind: item.kind,
            direction: Direction::Out,
            quantity: dec!(1.00),
            reason: "committed second".to_string(),
        })
        .await
        .unwrap();
    first.commit().await.unwrap();

    let history = MovementRepository::new(pool.clone())
        .list_for_item(item.kind, item.id, None, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].reason, "committed second");
    assert_eq!(history[1].reason, "committed first");
    assert!(history[0].occurred_at > history[1].occurred_at);
    assert_eq!(snapshot(&pool, &item).await.current_quantity, dec!(8.00));
}
