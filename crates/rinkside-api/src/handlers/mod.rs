//! Route handlers

pub mod auth;
pub mod invoices;
pub mod players;
pub mod users;

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::HealthResponse;
use crate::AppState;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = match state.db.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            warn!("Health check: database ping failed: {}", e);
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Parse a path id; anything that is not a UUID cannot exist
pub(crate) fn parse_id(id: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound(format!("{} '{}' not found", what, id)))
}

/// Trim a required text field, rejecting blanks
pub(crate) fn required(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("'{}' is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Normalise and sanity-check an email address
pub(crate) fn validate_email(email: &str) -> Result<String, ApiError> {
    let email = rinkside_db::normalize_email(email);
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ApiError::BadRequest(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}
