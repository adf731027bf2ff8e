use super::catalog::{catalog_routes, with_filter};
use super::common::{map_service_error, success_response};
use crate::{
    entities::production_plan,
    errors::{ApiError, ErrorResponse},
    handlers::AppState,
    services::{catalog::ProductionPlans, production::BatchCalculation},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};

/// Production plans plus the batch breakdown endpoint
pub fn production_routes() -> Router<AppState> {
    let plans = with_filter::<ProductionPlans>(
        catalog_routes::<ProductionPlans>("by-number"),
        "by-product",
        production_plan::Column::ProductCode,
    );

    Router::new()
        .nest("/plans", plans)
        .route("/batch-calculation/:plan_id", get(batch_calculation))
}

/// Whole and partial batches needed for a plan
#[utoipa::path(
    get,
    path = "/api/production/batch-calculation/{plan_id}",
    tag = "production",
    params(("plan_id" = i32, Path, description = "Production plan id")),
    responses(
        (status = 200, description = "Batch breakdown", body = BatchCalculation),
        (status = 400, description = "Batch size or planned quantity not defined", body = ErrorResponse),
        (status = 404, description = "Production plan not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn batch_calculation(
    State(state): State<AppState>,
    Path(plan_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let calculation = state
        .services
        .production
        .batch_calculation(plan_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(calculation))
}
