mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

fn codes(list: &Value, field: &str) -> Vec<String> {
    list.as_array()
        .expect("array")
        .iter()
        .map(|row| row[field].as_str().expect("code").to_string())
        .collect()
}

#[tokio::test]
async fn product_lists_split_on_bom_presence() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    app.seed_product("P0002", "Amoxicillin 250").await;
    app.create(
        "/api/product-categories",
        json!({ "pcat_code": "STK", "pcat_name": "Stock transfer" }),
    )
    .await;
    app.create(
        "/api/products",
        json!({ "product_code": "S0001", "product_name": "Transfer lot", "pcat_code": "STK" }),
    )
    .await;

    app.seed_bom("P0001", "001").await;
    app.seed_bom("P0001", "003").await;

    let (status, without_bom) = app.get("/api/lovs/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(codes(&without_bom, "p_code"), vec!["P0002"]);
    assert_eq!(without_bom[0]["pack"], "10 X 10");
    assert_eq!(without_bom[0]["p_desc"], "Amoxicillin 250");

    let (_, filtered) = app.get("/api/lovs/products?pcat_code=CAP").await;
    assert!(filtered.as_array().unwrap().is_empty());

    let (_, with_bom) = app.get("/api/lovs/products-with-bom").await;
    assert_eq!(codes(&with_bom, "p_code"), vec!["P0001"]);
    assert_eq!(with_bom[0]["current_version"], "003");
}

#[tokio::test]
async fn raw_material_list_hides_withdrawn_items() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    app.create(
        "/api/raw-materials",
        json!({ "raw_code": "R003", "raw_name": "** Talc (withdrawn)" }),
    )
    .await;
    app.create(
        "/api/raw-materials",
        json!({ "raw_code": "R004", "raw_name": "Lactose", "raw_stat": "I" }),
    )
    .await;

    let (status, list) = app.get("/api/lovs/raw-materials").await;
    assert_eq!(status, StatusCode::OK);
    // Ordered by name
    assert_eq!(codes(&list, "raw_code"), vec!["R002", "R001"]);
    assert_eq!(list[0]["raw_desc"], "Maize Starch");
}

#[tokio::test]
async fn employee_list_keeps_bom_signatories() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (status, list) = app.get("/api/lovs/employees").await;
    assert_eq!(status, StatusCode::OK);
    // E003 has the excluded job category, E900 sits outside the BOM departments
    assert_eq!(codes(&list, "emp_code"), vec!["E001", "E002"]);
    assert_eq!(list[0]["dept_desc"], "Production");
}

#[tokio::test]
async fn category_and_department_lists() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (_, categories) = app.get("/api/lovs/product-categories").await;
    assert_eq!(codes(&categories, "pcat_code"), vec!["TAB"]);

    let (_, all) = app.get("/api/lovs/departments").await;
    assert_eq!(codes(&all, "dept_code"), vec!["999", "055"]);

    let (_, bom_only) = app.get("/api/lovs/departments?bom_only=true").await;
    assert_eq!(codes(&bom_only, "dept_code"), vec!["055"]);
}
