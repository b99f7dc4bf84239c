//! Signup, login and current-user endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use rinkside_auth::{hash_password, verify_password, Role};
use rinkside_db::entities::user;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{required, validate_email};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::Identity;
use crate::models::*;
use crate::AppState;

/// Create an account and log it in
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or email already in use", body = ErrorResponse),
        (status = 403, description = "Signup is disabled", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if !state.allow_signup {
        return Err(ApiError::Forbidden("Signup is disabled".to_string()));
    }

    let name = required(&req.name, "name")?;
    let email = validate_email(&req.email)?;
    let role = req.role.unwrap_or(Role::Assistant);

    info!("Signing up {} as {}", email, role);

    if state.directory.find_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already in use".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let now = Utc::now();
    let created = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role.into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let issued = state.issuer.issue(&created.id.to_string())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: created.into(),
            token: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}

/// Exchange email and password for a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    debug!("Login attempt for {}", req.email.trim());

    // Unknown email and wrong password are indistinguishable to the caller
    let Some(account) = state.directory.find_by_email(&req.email).await? else {
        warn!("Login failed: unknown account");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&req.password, &account.password_hash) {
        warn!("Login failed: wrong password for {}", account.id);
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state.issuer.issue(&account.id)?;
    info!("User {} logged in", account.id);

    Ok(Json(AuthResponse {
        user: account.into(),
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

/// The authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(Extension(identity): Extension<Identity>) -> Json<User> {
    Json(User {
        id: identity.id,
        name: identity.name,
        email: identity.email,
        role: identity.role,
    })
}
