use super::common::{
    map_service_error, message_response, success_response, validate_input, PaginatedResponse,
};
use crate::{
    auth::AuthenticatedUser,
    entities::bom_history_master,
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    services::{
        bom::{
            ApprovalOutcome, AuthorizationOutcome, BomView, CreateBomRequest, NewVersion,
            UpdateBomRequest,
        },
        bom_history::HistorySnapshot,
        requirements::MaterialRequirements,
    },
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Creates the router for BOM endpoints
pub fn bom_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_boms).post(create_bom))
        .route("/:id", get(get_bom).put(update_bom).delete(delete_bom))
        .route("/by-product/:product_code", get(list_boms_by_product))
        .route("/:id/material-requirements", get(material_requirements))
        .route("/:id/approve", put(approve_bom))
        .route("/:id/authorize", put(authorize_bom))
        .route("/:id/create-history", post(create_history))
        .route("/:id/update-version", put(update_version))
        .route("/:id/history", get(list_history))
        .route("/history/:history_id", get(get_history))
}

// Query and response DTOs

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBomsQuery {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
    /// Hide soft-deleted masters
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RequirementsQuery {
    pub production_quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct ApproveQuery {
    #[validate(length(min = 1, max = 10))]
    pub approver_emp_code: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct AuthorizeQuery {
    #[validate(length(min = 1, max = 10))]
    pub authorizer_emp_code: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UpdateVersionQuery {
    pub new_version_no: String,
    pub new_initiator: String,
    pub new_note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: ApprovalOutcome,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorizationResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: AuthorizationOutcome,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryCreatedResponse {
    pub message: String,
    pub history_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionUpdatedResponse {
    pub message: String,
    pub new_version: String,
    pub history_id: i32,
}

// Handler functions

/// List BOM masters
#[utoipa::path(
    get,
    path = "/api/bom",
    tag = "bom",
    params(ListBomsQuery),
    responses(
        (status = 200, description = "Page of BOM masters", body = PaginatedResponse<BomView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_boms(
    State(state): State<AppState>,
    Query(query): Query<ListBomsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pagination = super::common::PaginationParams {
        skip: query.skip,
        limit: query.limit,
    };
    let (skip, limit) = pagination.resolve(&state.config);

    let (boms, total) = state
        .services
        .bom
        .list(query.active_only, skip, limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(boms, skip, limit, total)))
}

/// Get a BOM master with its active lines
#[utoipa::path(
    get,
    path = "/api/bom/{id}",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id")),
    responses(
        (status = 200, description = "BOM found", body = BomView),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_bom(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let bom = state.services.bom.get(id).await.map_err(map_service_error)?;
    Ok(success_response(bom))
}

/// All BOM masters for a product
#[utoipa::path(
    get,
    path = "/api/bom/by-product/{product_code}",
    tag = "bom",
    params(("product_code" = String, Path, description = "Product code")),
    responses((status = 200, description = "BOM masters of the product", body = [BomView])),
    security(("bearer_auth" = []))
)]
pub async fn list_boms_by_product(
    State(state): State<AppState>,
    Path(product_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let boms = state
        .services
        .bom
        .by_product(&product_code)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(boms))
}

/// Create a BOM master with its lines
#[utoipa::path(
    post,
    path = "/api/bom",
    tag = "bom",
    request_body = CreateBomRequest,
    responses(
        (status = 200, description = "BOM created", body = BomView),
        (status = 400, description = "Unknown reference or duplicate version", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_bom(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateBomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let bom = state
        .services
        .bom
        .create(payload, &user.user_id)
        .await
        .map_err(map_service_error)?;

    info!(bom_id = bom.master.id, user = %user.user_id, "BOM created");
    Ok(success_response(bom))
}

/// Patch a BOM master
#[utoipa::path(
    put,
    path = "/api/bom/{id}",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id")),
    request_body = UpdateBomRequest,
    responses(
        (status = 200, description = "BOM updated", body = BomView),
        (status = 400, description = "Unknown reference or duplicate version", body = ErrorResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_bom(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let bom = state
        .services
        .bom
        .update(id, payload, &user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(bom))
}

/// Soft delete a BOM master
#[utoipa::path(
    delete,
    path = "/api/bom/{id}",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id")),
    responses(
        (status = 200, description = "BOM deactivated", body = super::common::MessageResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_bom(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.bom.delete(id).await.map_err(map_service_error)?;
    Ok(message_response("BOM deleted successfully"))
}

/// Raw-material requirements for a production quantity
#[utoipa::path(
    get,
    path = "/api/bom/{id}/material-requirements",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id"), RequirementsQuery),
    responses(
        (status = 200, description = "Requirements per active line", body = MaterialRequirements),
        (status = 400, description = "Non-positive batch size", body = ErrorResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn material_requirements(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RequirementsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let requirements = state
        .services
        .bom
        .material_requirements(id, query.production_quantity)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(requirements))
}

/// Record the approver
#[utoipa::path(
    put,
    path = "/api/bom/{id}/approve",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id"), ApproveQuery),
    responses(
        (status = 200, description = "BOM approved", body = ApprovalResponse),
        (status = 400, description = "Unknown approver", body = ErrorResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_bom(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ApproveQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&query)?;

    let outcome = state
        .services
        .bom
        .approve(id, &query.approver_emp_code)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ApprovalResponse {
        message: "BOM approved successfully".to_string(),
        outcome,
    }))
}

/// Record the authorizer; requires a prior approval
#[utoipa::path(
    put,
    path = "/api/bom/{id}/authorize",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id"), AuthorizeQuery),
    responses(
        (status = 200, description = "BOM authorized", body = AuthorizationResponse),
        (status = 400, description = "Not approved yet or unknown authorizer", body = ErrorResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn authorize_bom(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&query)?;

    let outcome = state
        .services
        .bom
        .authorize(id, &query.authorizer_emp_code)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(AuthorizationResponse {
        message: "BOM authorized successfully".to_string(),
        outcome,
    }))
}

/// Snapshot the BOM into history
#[utoipa::path(
    post,
    path = "/api/bom/{id}/create-history",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id")),
    responses(
        (status = 200, description = "Snapshot stored", body = HistoryCreatedResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state
        .services
        .bom_history
        .create_history(id, &user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(HistoryCreatedResponse {
        message: "BOM history created successfully".to_string(),
        history_id: history.id,
    }))
}

/// Assign a new version; snapshots first and clears the approval
#[utoipa::path(
    put,
    path = "/api/bom/{id}/update-version",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id"), UpdateVersionQuery),
    responses(
        (status = 200, description = "Version updated", body = VersionUpdatedResponse),
        (status = 400, description = "Version already exists or unknown initiator", body = ErrorResponse),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_version(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<UpdateVersionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = NewVersion {
        new_version_no: query.new_version_no,
        new_initiator: query.new_initiator,
        new_note: query.new_note,
    };
    validate_input(&request)?;

    let outcome = state
        .services
        .bom
        .update_version(id, request, &user.user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(VersionUpdatedResponse {
        message: "BOM version updated successfully".to_string(),
        new_version: outcome.new_version,
        history_id: outcome.history_id,
    }))
}

/// History snapshots of the BOM's product, newest first
#[utoipa::path(
    get,
    path = "/api/bom/{id}/history",
    tag = "bom",
    params(("id" = i32, Path, description = "BOM id")),
    responses(
        (status = 200, description = "History masters", body = [bom_history_master::Model]),
        (status = 404, description = "BOM not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let history = state
        .services
        .bom_history
        .list_for_bom(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(history))
}

/// One history snapshot with its lines
#[utoipa::path(
    get,
    path = "/api/bom/history/{history_id}",
    tag = "bom",
    params(("history_id" = i32, Path, description = "History master id")),
    responses(
        (status = 200, description = "Snapshot", body = HistorySnapshot),
        (status = 404, description = "BOM history not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_history(
    State(state): State<AppState>,
    Path(history_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .services
        .bom_history
        .get(history_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(snapshot))
}
