use crate::config::AppConfig;
use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// `{ "message": ... }` acknowledgement
pub fn message_response(message: impl Into<String>) -> Response {
    success_response(MessageResponse {
        message: message.into(),
    })
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Offset pagination for list operations
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
pub struct PaginationParams {
    /// Records to skip (default 0)
    #[serde(default)]
    pub skip: u64,
    /// Page size; defaults to and is capped by the configured limits
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// Effective `(skip, limit)`; a zero limit falls back to the default.
    pub fn resolve(&self, config: &AppConfig) -> (u64, u64) {
        let limit = match self.limit {
            Some(0) | None => config.default_page_size,
            Some(limit) => limit.min(config.max_page_size),
        };
        (self.skip, limit)
    }
}

/// Standard pagination response metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub skip: u64,
    pub limit: u64,
    pub total: u64,
}

/// Standard paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, skip: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta { skip, limit, total },
        }
    }
}
