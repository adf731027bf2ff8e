mod common;

use axum::http::StatusCode;
use common::{dec, id_of, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn batch_calculation_splits_plan() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let plan = app
        .create(
            "/api/production/plans",
            json!({
                "plan_no": "PP-001",
                "plan_date": "2025-03-04",
                "product_code": "P0001",
                "planned_quantity": 250,
                "batch_size": 100
            }),
        )
        .await;
    assert_eq!(plan["status"], "Planned");

    let (status, body) = app
        .get(&format!("/api/production/batch-calculation/{}", id_of(&plan)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec(&body["batches_needed"]), dec!(2.5));
    assert_eq!(body["full_batches"], 2);
    assert_eq!(dec(&body["partial_batch_quantity"]), dec!(50));
    assert_eq!(dec(&body["total_production"]), dec!(250));

    let (_, by_product) = app.get("/api/production/plans/by-product/P0001").await;
    assert_eq!(by_product.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn batch_calculation_requires_batch_size() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let plan = app
        .create(
            "/api/production/plans",
            json!({
                "plan_no": "PP-002",
                "plan_date": "2025-03-04",
                "product_code": "P0001",
                "planned_quantity": 250
            }),
        )
        .await;

    let (status, body) = app
        .get(&format!("/api/production/batch-calculation/{}", id_of(&plan)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Batch size or planned quantity not defined");

    let (status, body) = app.get("/api/production/batch-calculation/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Production plan not found");
}

#[tokio::test]
async fn plans_in_progress_cannot_be_deleted() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let plan = app
        .create(
            "/api/production/plans",
            json!({
                "plan_no": "PP-003",
                "plan_date": "2025-03-04",
                "product_code": "P0001",
                "planned_quantity": 100
            }),
        )
        .await;
    let id = id_of(&plan);

    app.patch(&format!("/api/production/plans/{}/status?status=In%20Progress", id))
        .await;
    let (status, body) = app.delete(&format!("/api/production/plans/{}", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Only planned or cancelled production plans can be deleted"
    );

    app.patch(&format!("/api/production/plans/{}/status?status=Cancelled", id))
        .await;
    let (status, _) = app.delete(&format!("/api/production/plans/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn plan_for_unknown_product_is_rejected() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (status, body) = app
        .post(
            "/api/production/plans",
            json!({
                "plan_no": "PP-004",
                "plan_date": "2025-03-04",
                "product_code": "Z9999",
                "planned_quantity": 100
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product not found");
}
