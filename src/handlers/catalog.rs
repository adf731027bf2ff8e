//! Route builders shared by every catalog resource.

use super::common::{
    map_service_error, message_response, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::catalog::CatalogResource,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::Response,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogListQuery {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// CRUD routes for `R`; `code_segment` names the natural-key lookup,
/// e.g. `by-code` or `by-number`.
pub fn catalog_routes<R: CatalogResource>(code_segment: &str) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/:id",
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
        .route(&format!("/{}/:code", code_segment), get(get_by_code::<R>));

    if R::STATUSES.is_empty() {
        router
    } else {
        router.route("/:id/status", patch(set_status::<R>))
    }
}

/// Adds `GET /{segment}/:value` listing the records whose `column` equals `value`.
pub fn with_filter<R: CatalogResource>(
    router: Router<AppState>,
    segment: &str,
    column: R::Column,
) -> Router<AppState> {
    router.route(
        &format!("/{}/:value", segment),
        get(
            move |State(state): State<AppState>, Path(value): Path<String>| async move {
                let rows = state
                    .services
                    .catalog
                    .list_where::<R>(column, &value)
                    .await
                    .map_err(map_service_error)?;
                Ok::<Response, ApiError>(success_response(rows))
            },
        ),
    )
}

async fn list<R: CatalogResource>(
    State(state): State<AppState>,
    Query(query): Query<CatalogListQuery>,
) -> Result<Response, ApiError> {
    let (skip, limit) = PaginationParams {
        skip: query.skip,
        limit: query.limit,
    }
    .resolve(&state.config);

    let (rows, total) = state
        .services
        .catalog
        .list::<R>(query.active_only, skip, limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(rows, skip, limit, total)))
}

async fn get_one<R: CatalogResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let view = state
        .services
        .catalog
        .get::<R>(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

async fn get_by_code<R: CatalogResource>(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, ApiError> {
    let view = state
        .services
        .catalog
        .get_by_code::<R>(&code)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

async fn create<R: CatalogResource>(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<R::Create>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let view = state
        .services
        .catalog
        .create::<R>(payload, &user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

async fn update<R: CatalogResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<R::Update>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let view = state
        .services
        .catalog
        .update::<R>(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

async fn set_status<R: CatalogResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ApiError> {
    state
        .services
        .catalog
        .set_status::<R>(id, &query.status)
        .await
        .map_err(map_service_error)?;
    Ok(message_response(format!(
        "{} status updated to {}",
        R::LABEL,
        query.status
    )))
}

async fn delete<R: CatalogResource>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state
        .services
        .catalog
        .delete::<R>(id)
        .await
        .map_err(map_service_error)?;
    Ok(message_response(format!("{} deleted successfully", R::LABEL)))
}
