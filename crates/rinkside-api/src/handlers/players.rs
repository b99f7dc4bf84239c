//! Player records

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use rinkside_db::entities::{invoice, player, prelude::*};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{parse_id, required};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::Identity;
use crate::models;
use crate::models::{ErrorResponse, PlayerInput, PlayerList};
use crate::AppState;

/// Validated, trimmed player fields
struct PlayerFields {
    name: String,
    position: String,
    team: String,
    nationality: String,
}

fn validate(input: &PlayerInput) -> ApiResult<PlayerFields> {
    if !(input.height.is_finite() && input.height > 0.0)
        || !(input.weight.is_finite() && input.weight > 0.0)
    {
        return Err(ApiError::BadRequest(
            "'height' and 'weight' must be positive numbers".to_string(),
        ));
    }
    if let (Some(start), Some(end)) = (input.contract_start, input.contract_end) {
        if end < start {
            return Err(ApiError::BadRequest(
                "'contract_end' must not be before 'contract_start'".to_string(),
            ));
        }
    }

    Ok(PlayerFields {
        name: required(&input.name, "name")?,
        position: required(&input.position, "position")?,
        team: required(&input.team, "team")?,
        nationality: required(&input.nationality, "nationality")?,
    })
}

fn apply(active: &mut player::ActiveModel, fields: PlayerFields, input: PlayerInput) {
    active.name = Set(fields.name);
    active.position = Set(fields.position);
    active.team = Set(fields.team);
    active.nationality = Set(fields.nationality);
    active.date_of_birth = Set(input.date_of_birth);
    active.height = Set(input.height);
    active.weight = Set(input.weight);
    active.stats = Set(input.stats);
    active.contract_start = Set(input.contract_start);
    active.contract_end = Set(input.contract_end);
    active.contract_value = Set(input.contract_value);
    active.updated_at = Set(Utc::now());
}

/// List all players
#[utoipa::path(
    get,
    path = "/api/players",
    responses(
        (status = 200, description = "List of players", body = PlayerList),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "players"
)]
pub async fn list_players(State(state): State<Arc<AppState>>) -> ApiResult<Json<PlayerList>> {
    debug!("Listing players");

    let players: Vec<models::Player> = Player::find()
        .order_by_asc(player::Column::Name)
        .all(&state.db)
        .await?
        .into_iter()
        .map(models::Player::from)
        .collect();

    let total = players.len();
    Ok(Json(PlayerList { players, total }))
}

/// Get a single player
#[utoipa::path(
    get,
    path = "/api/players/{id}",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    responses(
        (status = 200, description = "Player", body = models::Player),
        (status = 404, description = "Player not found", body = ErrorResponse)
    ),
    tag = "players"
)]
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<models::Player>> {
    let id = parse_id(&id, "Player")?;

    let found = Player::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Player '{}' not found", id)))?;

    Ok(Json(found.into()))
}

/// Add a player
#[utoipa::path(
    post,
    path = "/api/players",
    request_body = PlayerInput,
    responses(
        (status = 201, description = "Player created", body = models::Player),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "ADMIN or AGENT role required", body = ErrorResponse)
    ),
    tag = "players"
)]
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Identity>,
    ApiJson(input): ApiJson<PlayerInput>,
) -> ApiResult<(StatusCode, Json<models::Player>)> {
    let fields = validate(&input)?;

    let now = Utc::now();
    let mut active = player::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(now),
        ..Default::default()
    };
    apply(&mut active, fields, input);

    let created = active.insert(&state.db).await?;
    info!("{} created player {} ({})", caller.id, created.id, created.name);

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Replace a player's details
#[utoipa::path(
    put,
    path = "/api/players/{id}",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    request_body = PlayerInput,
    responses(
        (status = 200, description = "Player updated", body = models::Player),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "ADMIN or AGENT role required", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse)
    ),
    tag = "players"
)]
pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PlayerInput>,
) -> ApiResult<Json<models::Player>> {
    let id = parse_id(&id, "Player")?;
    let fields = validate(&input)?;

    let existing = Player::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Player '{}' not found", id)))?;

    let mut active: player::ActiveModel = existing.into();
    apply(&mut active, fields, input);

    let updated = active.update(&state.db).await?;
    info!("{} updated player {}", caller.id, id);

    Ok(Json(updated.into()))
}

/// Delete a player and their invoices
#[utoipa::path(
    delete,
    path = "/api/players/{id}",
    params(
        ("id" = String, Path, description = "Player ID")
    ),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Player not found", body = ErrorResponse)
    ),
    tag = "players"
)]
pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "Player")?;

    let txn = state.db.begin().await?;
    let invoices = Invoice::delete_many()
        .filter(invoice::Column::PlayerId.eq(id))
        .exec(&txn)
        .await?;
    let result = Player::delete_by_id(id).exec(&txn).await?;

    if result.rows_affected == 0 {
        txn.rollback().await?;
        return Err(ApiError::NotFound(format!("Player '{}' not found", id)));
    }
    txn.commit().await?;

    info!(
        "{} deleted player {} ({} invoices)",
        caller.id, id, invoices.rows_affected
    );
    Ok(StatusCode::NO_CONTENT)
}
