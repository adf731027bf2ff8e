use super::common::{map_service_error, success_response};
use crate::{
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    services::lovs::{
        CategoryLov, DepartmentLov, EmployeeLov, ProductLov, ProductWithBomLov, RawMaterialLov,
    },
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

pub fn lov_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products))
        .route("/products-with-bom", get(products_with_bom))
        .route("/raw-materials", get(raw_materials))
        .route("/employees", get(employees))
        .route("/product-categories", get(product_categories))
        .route("/departments", get(departments))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductLovQuery {
    /// Restrict to one product category
    pub pcat_code: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DepartmentLovQuery {
    #[serde(default)]
    pub bom_only: bool,
}

/// Products that do not have a BOM yet
#[utoipa::path(
    get,
    path = "/api/lovs/products",
    tag = "lovs",
    params(ProductLovQuery),
    responses(
        (status = 200, description = "Products without a BOM", body = [ProductLov]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductLovQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .lovs
        .products(query.pcat_code.as_deref())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Products with a BOM and their latest version
#[utoipa::path(
    get,
    path = "/api/lovs/products-with-bom",
    tag = "lovs",
    params(ProductLovQuery),
    responses((status = 200, description = "Products with a BOM", body = [ProductWithBomLov])),
    security(("bearer_auth" = []))
)]
pub async fn products_with_bom(
    State(state): State<AppState>,
    Query(query): Query<ProductLovQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .lovs
        .products_with_bom(query.pcat_code.as_deref())
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

#[utoipa::path(
    get,
    path = "/api/lovs/raw-materials",
    tag = "lovs",
    responses((status = 200, description = "Current raw materials", body = [RawMaterialLov])),
    security(("bearer_auth" = []))
)]
pub async fn raw_materials(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .lovs
        .raw_materials()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Employees allowed to sign BOM workflow steps
#[utoipa::path(
    get,
    path = "/api/lovs/employees",
    tag = "lovs",
    responses((status = 200, description = "Eligible employees", body = [EmployeeLov])),
    security(("bearer_auth" = []))
)]
pub async fn employees(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .lovs
        .employees()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

#[utoipa::path(
    get,
    path = "/api/lovs/product-categories",
    tag = "lovs",
    responses((status = 200, description = "Active categories", body = [CategoryLov])),
    security(("bearer_auth" = []))
)]
pub async fn product_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .lovs
        .product_categories()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

#[utoipa::path(
    get,
    path = "/api/lovs/departments",
    tag = "lovs",
    params(DepartmentLovQuery),
    responses((status = 200, description = "Active departments", body = [DepartmentLov])),
    security(("bearer_auth" = []))
)]
pub async fn departments(
    State(state): State<AppState>,
    Query(query): Query<DepartmentLovQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .lovs
        .departments(query.bom_only)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}
