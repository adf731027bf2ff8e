mod common;

use axum::http::StatusCode;
use common::{dec, id_of, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn supplier_crud_round() {
    let app = TestApp::new().await;

    let supplier = app
        .create(
            "/api/suppliers",
            json!({ "sup_code": "S01", "sup_name": "Acme Chemicals", "email": "sales@acme.test" }),
        )
        .await;
    let id = id_of(&supplier);
    assert_eq!(supplier["is_active"], true);

    let (status, by_code) = app.get("/api/suppliers/by-code/S01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_code["id"], supplier["id"]);

    let (status, updated) = app
        .put(
            &format!("/api/suppliers/{}", id),
            Some(json!({ "phone": "555-0100" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-0100");
    assert_eq!(updated["sup_name"], "Acme Chemicals");
    assert_eq!(updated["email"], "sales@acme.test");

    let (status, body) = app
        .post(
            "/api/suppliers",
            json!({ "sup_code": "S01", "sup_name": "Someone Else" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["message"], "Supplier code already exists");

    let (status, body) = app.delete(&format!("/api/suppliers/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Supplier deleted successfully");

    // Soft delete keeps the row
    let (status, fetched) = app.get(&format!("/api/suppliers/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["is_active"], false);
    let (_, active) = app.get("/api/suppliers?active_only=true").await;
    assert_eq!(active["pagination"]["total"], 0);
}

#[tokio::test]
async fn unknown_records_are_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/suppliers/77").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Supplier not found");

    let (status, _) = app.get("/api/raw-materials/by-code/R404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/procurement/requisitions/5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_shape_is_validated() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/suppliers",
            json!({ "sup_code": "S02", "sup_name": "Bad Mail", "email": "not-an-address" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn foreign_keys_are_checked_on_create_and_update() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (status, body) = app
        .post(
            "/api/products",
            json!({ "product_code": "P0009", "product_name": "Orphan", "pcat_code": "NOPE" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product category not found");

    let (status, body) = app
        .post(
            "/api/employees",
            json!({ "emp_code": "E777", "emp_office_name": "Nobody", "dept_code": "404" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Department not found");

    let (_, employee) = app.get("/api/employees/by-code/E001").await;
    let (status, body) = app
        .put(
            &format!("/api/employees/{}", id_of(&employee)),
            Some(json!({ "dept_code": "404" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Department not found");

    let (status, body) = app
        .post(
            "/api/procurement/orders",
            json!({ "po_no": "PO-1", "po_date": "2025-03-01", "sup_code": "S404" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Supplier not found");
}

#[tokio::test]
async fn filter_routes_list_matching_records() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    app.create(
        "/api/product-categories",
        json!({ "pcat_code": "CAP", "pcat_name": "Capsules" }),
    )
    .await;
    app.create(
        "/api/products",
        json!({ "product_code": "C0001", "product_name": "Omeprazole 20", "pcat_code": "CAP" }),
    )
    .await;

    let (status, tablets) = app.get("/api/products/by-category/TAB").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = tablets
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["product_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["P0001"]);

    let (_, staff) = app.get("/api/employees/by-department/055").await;
    assert_eq!(staff.as_array().unwrap().len(), 3);

    app.create(
        "/api/quality/tests",
        json!({ "test_code": "QC-DISS", "test_name": "Dissolution", "test_category": "Physical" }),
    )
    .await;
    let (_, physical) = app.get("/api/quality/tests/by-category/Physical").await;
    assert_eq!(physical.as_array().unwrap().len(), 1);
    let (_, chemical) = app.get("/api/quality/tests/by-category/Chemical").await;
    assert!(chemical.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn requisition_with_items_and_draft_only_delete() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let requisition = app
        .create(
            "/api/procurement/requisitions",
            json!({
                "req_no": "REQ-001",
                "req_date": "2025-03-01",
                "department": "055",
                "items": [
                    { "item_no": 1, "raw_code": "R001", "quantity": 25, "estimated_rate": 4 },
                    { "item_no": 2, "raw_code": "R002", "quantity": 10 }
                ]
            }),
        )
        .await;
    let id = id_of(&requisition);
    assert_eq!(requisition["status"], "Draft");
    assert_eq!(requisition["priority"], "Normal");
    assert_eq!(requisition["items"].as_array().unwrap().len(), 2);

    let (_, by_number) = app.get("/api/procurement/requisitions/by-number/REQ-001").await;
    assert_eq!(by_number["items"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .patch(&format!("/api/procurement/requisitions/{}/status?status=Shipped", id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid status. Must be one of: Draft, Submitted, Approved, Rejected, Cancelled"
    );

    let (status, _) = app
        .patch(&format!("/api/procurement/requisitions/{}/status?status=Submitted", id))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .delete(&format!("/api/procurement/requisitions/{}", id))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "PRECONDITION_FAILED");
    assert_eq!(body["message"], "Only draft requisitions can be deleted");

    app.patch(&format!("/api/procurement/requisitions/{}/status?status=Draft", id))
        .await;
    let (status, _) = app
        .delete(&format!("/api/procurement/requisitions/{}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/procurement/requisitions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn requisition_with_unknown_item_is_rolled_back() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (status, body) = app
        .post(
            "/api/procurement/requisitions",
            json!({
                "req_no": "REQ-002",
                "req_date": "2025-03-01",
                "items": [
                    { "item_no": 1, "raw_code": "R001", "quantity": 1 },
                    { "item_no": 2, "raw_code": "R999", "quantity": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Raw material R999 not found");

    let (status, _) = app.get("/api/procurement/requisitions/by-number/REQ-002").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchase_order_items_default_amount_and_filter_by_supplier() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    app.create(
        "/api/suppliers",
        json!({ "sup_code": "S01", "sup_name": "Acme Chemicals" }),
    )
    .await;

    let order = app
        .create(
            "/api/procurement/orders",
            json!({
                "po_no": "PO-100",
                "po_date": "2025-03-02",
                "sup_code": "S01",
                "items": [
                    { "item_no": 1, "raw_code": "R001", "quantity": 12.5, "unit_rate": 4 }
                ]
            }),
        )
        .await;
    assert_eq!(order["status"], "Draft");
    assert_eq!(dec(&order["items"][0]["amount"]), dec!(50));

    let (_, by_supplier) = app.get("/api/procurement/orders/by-supplier/S01").await;
    assert_eq!(by_supplier.as_array().unwrap().len(), 1);

    let (status, body) = app
        .post(
            "/api/procurement/orders",
            json!({
                "po_no": "PO-101",
                "po_date": "2025-03-02",
                "sup_code": "S01",
                "status": "Lost"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid status. Must be one of: Draft, Sent, Acknowledged, Closed, Cancelled"
    );
}

#[tokio::test]
async fn letter_of_credit_delete_policy() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    app.create(
        "/api/suppliers",
        json!({ "sup_code": "S01", "sup_name": "Acme Chemicals" }),
    )
    .await;

    let lc = app
        .create(
            "/api/lc",
            json!({
                "lc_no": "LC-9",
                "lc_date": "2025-03-03",
                "sup_code": "S01",
                "lc_amount": 12000,
                "items": [
                    { "raw_code": "R001", "quantity": 100, "unit_price": 120, "amount": 12000 }
                ]
            }),
        )
        .await;
    let id = id_of(&lc);
    assert_eq!(lc["status"], "Open");

    app.patch(&format!("/api/lc/{}/status?status=Closed", id)).await;
    let (status, body) = app.delete(&format!("/api/lc/{}", id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only open or draft LCs can be deleted");

    app.patch(&format!("/api/lc/{}/status?status=Open", id)).await;
    let (status, _) = app.delete(&format!("/api/lc/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn drug_registrations_are_hard_deleted() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let registration = app
        .create(
            "/api/drugs/registrations",
            json!({ "drug_letter_ref_no": "DA/2025/17", "product_code": "P0001" }),
        )
        .await;
    assert_eq!(registration["status"], "Applied");

    let (_, by_product) = app.get("/api/drugs/registrations/by-product/P0001").await;
    assert_eq!(by_product.as_array().unwrap().len(), 1);

    let (status, _) = app
        .patch(&format!(
            "/api/drugs/registrations/{}/status?status=Under%20Review",
            id_of(&registration)
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(&format!("/api/drugs/registrations/{}", id_of(&registration)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/api/drugs/registrations/{}", id_of(&registration)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resources_without_statuses_have_no_status_route() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (_, product) = app.get("/api/products/by-code/P0001").await;
    let (status, _) = app
        .patch(&format!("/api/products/{}/status?status=Draft", id_of(&product)))
        .await;
    assert!(
        status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED,
        "unexpected status {}",
        status
    );
}
