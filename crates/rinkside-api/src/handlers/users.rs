//! User management (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use rinkside_auth::{hash_password, Role};
use rinkside_db::entities::{prelude::User as UserEntity, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{parse_id, required, validate_email};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::Identity;
use crate::models::*;
use crate::AppState;

async fn find_user(state: &AppState, id: Uuid) -> ApiResult<user::Model> {
    UserEntity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", id)))
}

async fn ensure_email_free(state: &AppState, email: &str, except: Option<Uuid>) -> ApiResult<()> {
    let mut query = UserEntity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except {
        query = query.filter(user::Column::Id.ne(id));
    }

    if query.one(&state.db).await?.is_some() {
        return Err(ApiError::BadRequest("Email already in use".to_string()));
    }
    Ok(())
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = UserList),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<UserList>> {
    debug!("Listing users");

    let users: Vec<User> = UserEntity::find()
        .order_by_asc(user::Column::Name)
        .all(&state.db)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let total = users.len();
    Ok(Json(UserList { users, total }))
}

/// Create a user with an initial password
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input or email already in use", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<Identity>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let name = required(&req.name, "name")?;
    let email = validate_email(&req.email)?;
    ensure_email_free(&state, &email, None).await?;

    let password_hash = hash_password(&req.password)?;

    let now = Utc::now();
    let created = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(req.role.into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(
        "Admin {} created user {} ({})",
        admin.id, created.id, req.role
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update a user's profile, role and optionally password
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input or email already in use", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id, "User")?;
    if admin.id == id.to_string() && req.role != Role::Admin {
        return Err(ApiError::BadRequest(
            "You cannot remove your own admin role".to_string(),
        ));
    }
    let existing = find_user(&state, id).await?;

    let name = required(&req.name, "name")?;
    let email = validate_email(&req.email)?;
    ensure_email_free(&state, &email, Some(id)).await?;

    let mut active: user::ActiveModel = existing.into();
    active.name = Set(name);
    active.email = Set(email);
    active.role = Set(req.role.into());
    if let Some(password) = &req.password {
        active.password_hash = Set(hash_password(password)?);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    info!("Admin {} updated user {} (role {})", admin.id, id, req.role);

    Ok(Json(updated.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Admins cannot delete their own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "User")?;
    if admin.id == id.to_string() {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let result = UserEntity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("User '{}' not found", id)));
    }

    info!("Admin {} deleted user {}", admin.id, id);
    Ok(StatusCode::NO_CONTENT)
}
