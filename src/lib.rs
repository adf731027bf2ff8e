//! Pharma ERP API Library
//!
//! Bills of materials with an approve/authorize workflow, version history and
//! material requirements, plus the catalog, procurement and production records
//! they reference.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{extract::Extension, http::HeaderValue, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthRouterExt, AuthService};
use crate::entities::{
    drug_registration, employee, letter_of_credit, product, purchase_order, quality_control_test,
};
use crate::handlers::catalog::{catalog_routes, with_filter};
use crate::services::catalog::{
    Departments, DrugRegistrations, Employees, LettersOfCredit, ProductCategories, Products,
    PurchaseOrders, PurchaseRequisitions, QcTests, RawMaterials, Suppliers,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Every authenticated route, mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    let products = with_filter::<Products>(
        catalog_routes::<Products>("by-code"),
        "by-category",
        product::Column::PcatCode,
    );
    let employees = with_filter::<Employees>(
        catalog_routes::<Employees>("by-code"),
        "by-department",
        employee::Column::DeptCode,
    );
    let orders = with_filter::<PurchaseOrders>(
        catalog_routes::<PurchaseOrders>("by-number"),
        "by-supplier",
        purchase_order::Column::SupCode,
    );
    let registrations = with_filter::<DrugRegistrations>(
        catalog_routes::<DrugRegistrations>("by-ref"),
        "by-product",
        drug_registration::Column::ProductCode,
    );
    let qc_tests = with_filter::<QcTests>(
        catalog_routes::<QcTests>("by-code"),
        "by-category",
        quality_control_test::Column::TestCategory,
    );
    let letters_of_credit = with_filter::<LettersOfCredit>(
        catalog_routes::<LettersOfCredit>("by-number"),
        "by-supplier",
        letter_of_credit::Column::SupCode,
    );

    Router::new()
        .nest("/bom", handlers::bom::bom_routes())
        .nest("/suppliers", catalog_routes::<Suppliers>("by-code"))
        .nest("/raw-materials", catalog_routes::<RawMaterials>("by-code"))
        .nest("/products", products)
        .nest(
            "/product-categories",
            catalog_routes::<ProductCategories>("by-code"),
        )
        .nest("/departments", catalog_routes::<Departments>("by-code"))
        .nest("/employees", employees)
        .nest(
            "/procurement/requisitions",
            catalog_routes::<PurchaseRequisitions>("by-number"),
        )
        .nest("/procurement/orders", orders)
        .nest("/production", handlers::production::production_routes())
        .nest("/drugs/registrations", registrations)
        .nest("/quality/tests", qc_tests)
        .nest("/lc", letters_of_credit)
        .nest("/lovs", handlers::lovs::lov_routes())
        .with_auth()
}

/// CORS from configuration: explicit origins when given, permissive otherwise.
/// `load_config` already refuses the permissive fallback outside development
/// unless it is opted into.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Full application: health, docs and the authenticated API
pub fn build_router(state: AppState, auth_service: Arc<AuthService>) -> Router {
    let cors = cors_layer(&state.config);
    let db = state.db.clone();

    Router::new()
        .route("/", get(|| async { "pharma-erp-api up" }))
        .nest("/api", api_routes().with_state(state))
        .nest("/health", health::health_routes(db))
        .merge(openapi::openapi_routes())
        .layer(TraceLayer::new_for_http().make_span_with(tracing::RequestSpanMaker))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(Extension(auth_service))
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
}

pub mod prelude {
    pub use crate::auth::{AuthService, AuthUser};
    pub use crate::config::AppConfig;
    pub use crate::errors::{ApiError, ServiceError};
    pub use crate::services::{
        BomHistoryService, BomService, CatalogService, LovService, ProductionService,
    };
    pub use crate::{build_router, AppState};
}
