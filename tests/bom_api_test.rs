mod common;

use axum::http::{Method, StatusCode};
use common::{bom_payload, dec, id_of, mint_token, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn requests_without_valid_token_are_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/bom", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let expired = mint_token("someone", -3600);
    let (status, _) = app
        .request(Method::GET, "/api/bom", None, Some(&expired))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_bom_stores_master_and_lines() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let bom = app.seed_bom("P0001", "001").await;
    assert_eq!(bom["product_code"], "P0001");
    assert_eq!(bom["version_no"], "001");
    assert_eq!(bom["workflow_state"], "Draft");
    assert_eq!(bom["user_id"], common::TEST_USER);
    assert_eq!(bom["created_by"], common::TEST_USER);
    assert_eq!(dec(&bom["batch_size"]), dec!(100));

    let details = bom["details"].as_array().expect("details");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["raw_code"], "R001");
    assert_eq!(details[0]["version_no"], "001");
    assert_eq!(details[0]["bom_id"], bom["id"]);

    let (status, fetched) = app.get(&format!("/api/bom/{}", id_of(&bom))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["details"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_bom_with_unknown_product_persists_nothing() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let (status, body) = app.post("/api/bom", bom_payload("NOPE", "001")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Product not found");

    let (_, list) = app.get("/api/bom").await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[tokio::test]
async fn create_bom_rejects_unknown_references_and_duplicates() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let mut payload = bom_payload("P0001", "001");
    payload["pcat_code"] = json!("XXX");
    let (status, body) = app.post("/api/bom", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product category not found");

    let mut payload = bom_payload("P0001", "001");
    payload["initiator"] = json!("E404");
    let (status, body) = app.post("/api/bom", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Initiator employee not found");

    let mut payload = bom_payload("P0001", "001");
    payload["details"][0]["raw_code"] = json!("R999");
    let (status, body) = app.post("/api/bom", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Raw material R999 not found");

    app.seed_bom("P0001", "001").await;
    let (status, body) = app.post("/api/bom", bom_payload("P0001", "001")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(
        body["message"],
        "BOM with this product and version already exists"
    );
}

#[tokio::test]
async fn non_positive_batch_size_is_rejected() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let mut payload = bom_payload("P0001", "001");
    payload["batch_size"] = json!(0);
    let (status, body) = app.post("/api/bom", payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Batch size must be greater than zero");
}

#[tokio::test]
async fn material_requirements_apply_overage() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let bom = app.seed_bom("P0001", "001").await;

    let (status, body) = app
        .get(&format!(
            "/api/bom/{}/material-requirements?production_quantity=50",
            id_of(&bom)
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let lines = body["requirements"].as_array().expect("requirements");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["raw_code"], "R001");
    assert_eq!(lines[0]["raw_material"], "Paracetamol BP");
    assert_eq!(dec(&lines[0]["required_quantity"]), dec!(5.25));
    assert_eq!(dec(&lines[0]["waste_percentage"]), dec!(5));
    assert_eq!(lines[0]["unit_of_measure"], "KG");
}

#[tokio::test]
async fn material_requirements_scale_linearly_without_overage() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let mut payload = bom_payload("P0001", "001");
    payload["details"] = json!([
        { "raw_code": "R001", "qty_per_batch": 7, "seq": 1 },
        { "raw_code": "R002", "qty_per_batch": 2.5, "seq": 2 }
    ]);
    let bom = app.create("/api/bom", payload).await;
    let id = id_of(&bom);

    let (_, single) = app
        .get(&format!("/api/bom/{}/material-requirements?production_quantity=30", id))
        .await;
    let (_, double) = app
        .get(&format!("/api/bom/{}/material-requirements?production_quantity=60", id))
        .await;

    let single = single["requirements"].as_array().unwrap();
    let double = double["requirements"].as_array().unwrap();
    assert_eq!(single.len(), 2);
    for (a, b) in single.iter().zip(double) {
        assert_eq!(a["raw_code"], b["raw_code"]);
        assert_eq!(dec(&a["required_quantity"]) * dec!(2), dec(&b["required_quantity"]));
    }
}

#[tokio::test]
async fn missing_bom_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .get("/api/bom/4242/material-requirements?production_quantity=10")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "BOM not found");

    let (status, _) = app.put("/api/bom/4242/approve?approver_emp_code=E002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn authorize_requires_prior_approval() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let id = id_of(&app.seed_bom("P0001", "001").await);

    let (status, body) = app
        .put(&format!("/api/bom/{}/authorize?authorizer_emp_code=E002", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "PRECONDITION_FAILED");
    assert_eq!(body["message"], "BOM must be approved before authorization");

    let (status, body) = app
        .put(&format!("/api/bom/{}/approve?approver_emp_code=E404", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Approver employee not found");
}

#[tokio::test]
async fn approve_authorize_then_reuse_version_conflicts() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let id = id_of(&app.seed_bom("P0001", "001").await);

    let (status, body) = app
        .put(&format!("/api/bom/{}/approve?approver_emp_code=E002", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "BOM approved successfully");
    assert_eq!(body["approved_by"], "E002");

    let (status, body) = app
        .put(&format!("/api/bom/{}/authorize?authorizer_emp_code=E001", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorized_by"], "E001");

    let (_, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(bom["workflow_state"], "Authorized");
    assert_eq!(bom["aprv_by"], "E002");
    assert_eq!(bom["auth_by"], "E001");

    let (status, body) = app
        .put(
            &format!("/api/bom/{}/update-version?new_version_no=001&new_initiator=E001", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["message"], "BOM version already exists");
}

#[tokio::test]
async fn update_version_resets_approval_and_cascades_to_lines() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let id = id_of(&app.seed_bom("P0001", "001").await);

    app.put(&format!("/api/bom/{}/approve?approver_emp_code=E002", id), None)
        .await;

    let (status, body) = app
        .put(
            &format!(
                "/api/bom/{}/update-version?new_version_no=002&new_initiator=E002&new_note=reformulated",
                id
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["new_version"], "002");
    let history_id = body["history_id"].as_i64().expect("history id");

    let (_, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(bom["version_no"], "002");
    assert_eq!(bom["initiator"], "E002");
    assert_eq!(bom["note"], "reformulated");
    assert!(bom["aprv_by"].is_null());
    assert!(bom["aprv_dt"].is_null());
    assert_eq!(bom["workflow_state"], "Draft");
    for line in bom["details"].as_array().unwrap() {
        assert_eq!(line["version_no"], "002");
    }

    // The snapshot keeps the pre-bump state
    let (status, snapshot) = app.get(&format!("/api/bom/history/{}", history_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["version_no"], "001");
    assert_eq!(snapshot["aprv_by"], "E002");
    assert_eq!(snapshot["sl_no"], 1);

    let (status, body) = app
        .put(
            &format!("/api/bom/{}/update-version?new_version_no=003&new_initiator=E404", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Initiator employee not found");
}

#[tokio::test]
async fn new_version_needs_its_own_authorization() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let id = id_of(&app.seed_bom("P0001", "001").await);

    app.put(&format!("/api/bom/{}/approve?approver_emp_code=E002", id), None)
        .await;
    app.put(&format!("/api/bom/{}/authorize?authorizer_emp_code=E001", id), None)
        .await;

    let (status, body) = app
        .put(
            &format!("/api/bom/{}/update-version?new_version_no=002&new_initiator=E001", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(bom["workflow_state"], "Draft");
    assert_eq!(bom["auth_by"], "E001");

    let (status, _) = app
        .put(&format!("/api/bom/{}/approve?approver_emp_code=E002", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(bom["workflow_state"], "Approved");

    let (status, _) = app
        .put(&format!("/api/bom/{}/authorize?authorizer_emp_code=E001", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(bom["workflow_state"], "Authorized");
}

#[tokio::test]
async fn create_history_is_additive() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;

    let mut payload = bom_payload("P0001", "001");
    payload["details"] = json!([
        { "raw_code": "R001", "qty_per_batch": 10, "seq": 1 },
        { "raw_code": "R002", "qty_per_batch": 4, "seq": 2 }
    ]);
    let id = id_of(&app.create("/api/bom", payload).await);

    let (status, first) = app.post_empty(&format!("/api/bom/{}/create-history", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "BOM history created successfully");
    let (_, second) = app.post_empty(&format!("/api/bom/{}/create-history", id)).await;

    let (_, history) = app.get(&format!("/api/bom/{}/history", id)).await;
    let history = history.as_array().expect("history list");
    assert_eq!(history.len(), 2);
    let serials: Vec<i64> = history.iter().map(|h| h["sl_no"].as_i64().unwrap()).collect();
    assert!(serials.contains(&1) && serials.contains(&2));
    assert!(history.iter().all(|h| h["hist_by"] == common::TEST_USER));

    let (_, snapshot) = app
        .get(&format!(
            "/api/bom/history/{}",
            second["history_id"].as_i64().unwrap()
        ))
        .await;
    assert_eq!(snapshot["details"].as_array().unwrap().len(), 2);
    assert_ne!(first["history_id"], second["history_id"]);

    // Live rows untouched
    let (_, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(bom["details"].as_array().unwrap().len(), 2);
    let (_, list) = app.get("/api/bom").await;
    assert_eq!(list["pagination"]["total"], 1);
}

#[tokio::test]
async fn missing_history_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app.get("/api/bom/history/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn soft_deleted_bom_stays_readable_but_leaves_active_listing() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let id = id_of(&app.seed_bom("P0001", "001").await);

    let (status, body) = app.delete(&format!("/api/bom/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "BOM deleted successfully");

    let (status, bom) = app.get(&format!("/api/bom/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bom["is_active"], false);

    let (_, active) = app.get("/api/bom?active_only=true").await;
    assert_eq!(active["pagination"]["total"], 0);
    let (_, all) = app.get("/api/bom").await;
    assert_eq!(all["pagination"]["total"], 1);
}

#[tokio::test]
async fn update_patches_only_given_fields() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    let id = id_of(&app.seed_bom("P0001", "001").await);

    let (status, bom) = app
        .put(
            &format!("/api/bom/{}", id),
            Some(json!({ "bmr_no": "BMR-17", "edit_by": "E002" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", bom);
    assert_eq!(bom["bmr_no"], "BMR-17");
    assert_eq!(bom["edit_by"], "E002");
    assert!(!bom["edit_dt"].is_null());
    assert_eq!(bom["batch_unit"], "KG");
    assert_eq!(bom["initiator"], "E001");
    assert_eq!(dec(&bom["batch_size"]), dec!(100));

    let (status, body) = app
        .put(&format!("/api/bom/{}", id), Some(json!({ "product_code": "NOPE" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn boms_are_listed_per_product_and_paginated() {
    let app = TestApp::new().await;
    app.seed_reference_data().await;
    app.seed_product("P0002", "Ibuprofen 200").await;

    app.seed_bom("P0001", "001").await;
    app.seed_bom("P0001", "002").await;
    app.seed_bom("P0002", "001").await;

    let (_, by_product) = app.get("/api/bom/by-product/P0001").await;
    let versions: Vec<&str> = by_product
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["version_no"].as_str().unwrap())
        .collect();
    assert_eq!(versions, vec!["001", "002"]);

    let (_, page) = app.get("/api/bom?skip=1&limit=1").await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["pagination"]["skip"], 1);
    assert_eq!(page["pagination"]["limit"], 1);
    assert_eq!(page["pagination"]["total"], 3);

    // Oversized limits are clamped to the configured maximum
    let (_, page) = app.get("/api/bom?limit=10000").await;
    assert_eq!(page["pagination"]["limit"], 50);
}
