//! End-to-end reconciliation of lending orders against a mocked backend.
//!
//! Run with: cargo test -p lendstock-integration-tests

#![allow(clippy::unwrap_used)]

use lendstock_client::{ApiError, ReconciliationPlan, ServiceError};
use lendstock_core::reconcile::{DestinationMap, ReconcileError, SalesQuantityMap};
use lendstock_core::{Destination, OrderId};
use lendstock_integration_tests::{TEST_TOKEN, TestContext, batch_row, serialized_row};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const ORDER: &str = "L-2024-031";

async fn context_with_items() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.mount_order(ORDER).await;
    ctx.mount_items(
        ORDER,
        json!([
            serialized_row(ORDER, "Cordless Drill", "BX-1", "SN-001"),
            serialized_row(ORDER, "Laser Level", "BX-1", "SN-002"),
            batch_row(ORDER, "Cable Ties", "BX-7", 50),
            {
                "lentId": 9,
                "orderId": ORDER,
                "productName": "Angle Grinder",
                "boxBarcode": "BX-2",
                "productBarcode": "SN-003",
                "quantity": 1,
                "status": "processed"
            }
        ]),
    )
    .await;
    ctx
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_mixed_reconciliation_sends_expected_body() {
    let ctx = context_with_items().await;

    Mock::given(method("POST"))
        .and(path(TestContext::process_path(ORDER)))
        .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(body_json(json!({
            "employeeId": "E-42",
            "shopName": "Harbour Street",
            "note": "Trade show wrap-up",
            "returnToStock": ["SN-001", "BX-7:30"],
            "moveToSales": ["BX-7:20"],
            "markAsBroken": ["SN-002"],
            "condition": null,
            "salesOrderId": "INV-5521",
            "isDirectSales": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let plan = ReconciliationPlan {
        destinations: DestinationMap::from([
            ("SN-002".to_string(), Destination::Broken),
            ("BX-7".to_string(), Destination::Sales),
        ]),
        sales_quantities: SalesQuantityMap::from([("BX-7".to_string(), 20)]),
        sales_order_id: Some(" INV-5521 ".to_string()),
        note: Some("Trade show wrap-up".to_string()),
    };

    let outcome = ctx
        .service()
        .process(&OrderId::new(ORDER), &plan)
        .await
        .unwrap();

    let totals = outcome.reconciliation.unit_totals();
    assert_eq!((totals.returned, totals.sold, totals.broken), (31, 20, 1));
    assert_eq!(outcome.receipt.status, 200);
    assert_eq!(outcome.receipt.body, Some(json!({"status": "completed"})));
}

#[tokio::test]
async fn test_default_plan_returns_everything() {
    let ctx = context_with_items().await;

    Mock::given(method("POST"))
        .and(path(TestContext::process_path(ORDER)))
        .and(body_json(json!({
            "employeeId": "E-42",
            "shopName": "Harbour Street",
            "note": "Batch processing",
            "returnToStock": ["SN-001", "SN-002", "BX-7:50"],
            "moveToSales": [],
            "markAsBroken": [],
            "condition": null,
            "isDirectSales": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let outcome = ctx
        .service()
        .process(&OrderId::new(ORDER), &ReconciliationPlan::default())
        .await
        .unwrap();

    assert_eq!(outcome.reconciliation.unit_totals().returned, 52);
    assert!(outcome.receipt.body.is_none());
}

#[tokio::test]
async fn test_full_box_sale_has_no_remainder() {
    let ctx = context_with_items().await;

    Mock::given(method("POST"))
        .and(path(TestContext::process_path(ORDER)))
        .and(body_json(json!({
            "employeeId": "E-42",
            "shopName": "Harbour Street",
            "note": "Batch processing",
            "returnToStock": ["SN-001", "SN-002"],
            "moveToSales": ["BX-7:50"],
            "markAsBroken": [],
            "condition": null,
            "salesOrderId": "INV-1",
            "isDirectSales": false
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let plan = ReconciliationPlan {
        destinations: DestinationMap::from([("BX-7".to_string(), Destination::Sales)]),
        sales_quantities: SalesQuantityMap::from([("BX-7".to_string(), 50)]),
        sales_order_id: Some("INV-1".to_string()),
        note: None,
    };

    ctx.service()
        .process(&OrderId::new(ORDER), &plan)
        .await
        .unwrap();
}

// ============================================================================
// Validation: nothing reaches the backend
// ============================================================================

#[tokio::test]
async fn test_invalid_plans_never_post() {
    let ctx = context_with_items().await;

    Mock::given(method("POST"))
        .and(path(TestContext::process_path(ORDER)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let service = ctx.service();
    let order_id = OrderId::new(ORDER);

    let no_invoice = ReconciliationPlan {
        destinations: DestinationMap::from([("SN-001".to_string(), Destination::Sales)]),
        ..ReconciliationPlan::default()
    };
    let err = service.process(&order_id, &no_invoice).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ReconcileError::MissingSalesOrderId)
    ));

    let too_many = ReconciliationPlan {
        destinations: DestinationMap::from([("BX-7".to_string(), Destination::Sales)]),
        sales_quantities: SalesQuantityMap::from([("BX-7".to_string(), 51)]),
        sales_order_id: Some("INV-1".to_string()),
        note: None,
    };
    let err = service.process(&order_id, &too_many).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ReconcileError::InvalidSalesQuantity { .. })
    ));
    assert!(err.to_string().contains("Cable Ties"));

    let no_quantity = ReconciliationPlan {
        sales_quantities: SalesQuantityMap::new(),
        ..too_many
    };
    let err = service.process(&order_id, &no_quantity).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ReconcileError::InvalidSalesQuantity { .. })
    ));
}

#[tokio::test]
async fn test_fully_processed_order_has_nothing_to_submit() {
    let ctx = TestContext::new().await;
    ctx.mount_order(ORDER).await;
    ctx.mount_items(
        ORDER,
        json!([{
            "lentId": 9,
            "orderId": ORDER,
            "productName": "Angle Grinder",
            "boxBarcode": "BX-2",
            "productBarcode": "SN-003",
            "quantity": 1,
            "status": "processed"
        }]),
    )
    .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let err = ctx
        .service()
        .process(&OrderId::new(ORDER), &ReconciliationPlan::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Validation(ReconcileError::NoItemsSelected)
    ));
}

// ============================================================================
// Backend failures
// ============================================================================

#[tokio::test]
async fn test_backend_rejection_is_passed_through() {
    let ctx = context_with_items().await;

    Mock::given(method("POST"))
        .and(path(TestContext::process_path(ORDER)))
        .respond_with(
            ResponseTemplate::new(409).set_body_string("Item SN-002 is no longer lent"),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let err = ctx
        .service()
        .process(&OrderId::new(ORDER), &ReconciliationPlan::default())
        .await
        .unwrap_err();

    match err {
        ServiceError::Api(ApiError::Rejected { status, body }) => {
            assert_eq!(status, 409);
            assert_eq!(body, "Item SN-002 is no longer lent");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let ctx = TestContext::new().await;

    let err = ctx
        .service()
        .prepare(&OrderId::new("L-missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Api(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_dry_run_does_not_post() {
    let ctx = context_with_items().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let prepared = ctx
        .service()
        .plan(&OrderId::new(ORDER), &ReconciliationPlan::default())
        .await
        .unwrap();

    assert_eq!(
        prepared.command.return_to_stock,
        vec!["SN-001", "SN-002", "BX-7:50"]
    );
}
