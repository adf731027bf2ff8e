#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use pharma_erp_api::{
    auth::{AuthService, Claims},
    build_router,
    config::AppConfig,
    db, AppState,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration_test_secret_with_enough_entropy_7d1c";
pub const TEST_USER: &str = "qa.officer";

/// Application wired exactly as in production, backed by a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    token: String,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let database_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("pharma_erp_test.db").display()
        );

        let mut cfg = AppConfig::new(
            database_url,
            TEST_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.cors_allow_any_origin = true;
        cfg.db_max_connections = 4;
        cfg.default_page_size = 20;
        cfg.max_page_size = 50;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let auth_service = Arc::new(AuthService::new((&cfg).into()));
        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone(), auth_service);

        Self {
            router,
            state,
            token: mint_token(TEST_USER, 3600),
            _dir: dir,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request with an optional bearer token; returns status and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, Some(self.token())).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), Some(self.token()))
            .await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, None, Some(self.token())).await
    }

    pub async fn put(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, body, Some(self.token())).await
    }

    pub async fn patch(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, None, Some(self.token())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None, Some(self.token()))
            .await
    }

    /// Creates a record and returns its body, failing the test on any other status.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, value) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::OK, "POST {} failed: {}", uri, value);
        value
    }

    /// Category TAB, departments 055 (BOM) and 999, employees E001/E002 in 055,
    /// E900 in 999, product P0001, raw materials R001/R002.
    pub async fn seed_reference_data(&self) {
        self.create(
            "/api/product-categories",
            json!({ "pcat_code": "TAB", "pcat_name": "Tablets" }),
        )
        .await;
        self.create(
            "/api/departments",
            json!({ "dept_code": "055", "dept_name": "Production" }),
        )
        .await;
        self.create(
            "/api/departments",
            json!({ "dept_code": "999", "dept_name": "Canteen" }),
        )
        .await;
        for (code, name, job) in [
            ("E001", "Alice Initiator", Some("1")),
            ("E002", "Bob Approver", None),
            ("E003", "Carol Helper", Some("5")),
        ] {
            self.create(
                "/api/employees",
                json!({
                    "emp_code": code,
                    "emp_office_name": name,
                    "dept_code": "055",
                    "job_category": job,
                }),
            )
            .await;
        }
        self.create(
            "/api/employees",
            json!({ "emp_code": "E900", "emp_office_name": "Dan Cook", "dept_code": "999" }),
        )
        .await;
        self.seed_product("P0001", "Paracetamol 500").await;
        for (code, name) in [("R001", "Paracetamol BP"), ("R002", "Maize Starch")] {
            self.create(
                "/api/raw-materials",
                json!({ "raw_code": code, "raw_name": name, "unit_of_measure": "KG" }),
            )
            .await;
        }
    }

    pub async fn seed_product(&self, code: &str, name: &str) -> Value {
        self.create(
            "/api/products",
            json!({
                "product_code": code,
                "product_name": name,
                "pcat_code": "TAB",
                "pack_size": "10",
                "pack_size1": "10",
                "pack_size2": "10",
                "dosage_form": "Tablet",
                "strength": "500 mg",
            }),
        )
        .await
    }

    /// BOM for `product_code`/`version_no` with batch size 100 and one R001 line
    /// of 10 per batch at 5% overage.
    pub async fn seed_bom(&self, product_code: &str, version_no: &str) -> Value {
        self.create("/api/bom", bom_payload(product_code, version_no))
            .await
    }
}

pub fn bom_payload(product_code: &str, version_no: &str) -> Value {
    json!({
        "pcat_code": "TAB",
        "product_code": product_code,
        "batch_size": 100,
        "version_no": version_no,
        "initiator": "E001",
        "batch_unit": "KG",
        "details": [
            {
                "raw_code": "R001",
                "qty_per_batch": 10,
                "overage": 5,
                "qty_per_batch_unit": "KG",
                "seq": 1
            }
        ]
    })
}

/// HS256 token for `sub`, valid for `ttl_secs` (negative for an expired token).
pub fn mint_token(sub: &str, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        name: Some("QA Officer".to_string()),
        roles: vec!["qa".to_string()],
        exp: now + ttl_secs,
        iat: Some(now),
        iss: None,
        aud: None,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode access token")
}

/// Reads a decimal that may be serialized as a JSON string or number.
pub fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("expected a decimal, got {}", other),
    }
}

pub fn id_of(value: &Value) -> i64 {
    value["id"].as_i64().expect("record id")
}
