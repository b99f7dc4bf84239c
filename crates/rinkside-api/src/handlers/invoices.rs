//! Player invoices

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use rinkside_db::entities::{invoice, player, prelude::*};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{parse_id, required};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::middleware::Identity;
use crate::models;
use crate::models::{ErrorResponse, InvoiceInput, InvoiceList};
use crate::AppState;

/// Resolve the invoiced player; an unknown player is a client error here, not a 404
async fn invoiced_player(state: &AppState, player_id: &str) -> ApiResult<player::Model> {
    let not_found = || ApiError::BadRequest(format!("Player '{}' not found", player_id.trim()));

    let id = Uuid::parse_str(player_id.trim()).map_err(|_| not_found())?;
    Player::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(not_found)
}

fn check_amount(amount: f64) -> ApiResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ApiError::BadRequest(
            "'amount' must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// List all invoices, soonest due first
#[utoipa::path(
    get,
    path = "/api/invoices",
    responses(
        (status = 200, description = "List of invoices", body = InvoiceList),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn list_invoices(State(state): State<Arc<AppState>>) -> ApiResult<Json<InvoiceList>> {
    debug!("Listing invoices");

    let invoices: Vec<models::Invoice> = Invoice::find()
        .find_also_related(Player)
        .order_by_asc(invoice::Column::DueDate)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|(invoice, player)| models::Invoice::from_model(invoice, player))
        .collect();

    let total = invoices.len();
    Ok(Json(InvoiceList { invoices, total }))
}

/// Get a single invoice
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    params(
        ("id" = String, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice", body = models::Invoice),
        (status = 404, description = "Invoice not found", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<models::Invoice>> {
    let id = parse_id(&id, "Invoice")?;

    let (found, player) = Invoice::find_by_id(id)
        .find_also_related(Player)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice '{}' not found", id)))?;

    Ok(Json(models::Invoice::from_model(found, player)))
}

/// Raise an invoice against a player
#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = InvoiceInput,
    responses(
        (status = 201, description = "Invoice created", body = models::Invoice),
        (status = 400, description = "Invalid input or unknown player", body = ErrorResponse),
        (status = 403, description = "ADMIN or AGENT role required", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Identity>,
    ApiJson(input): ApiJson<InvoiceInput>,
) -> ApiResult<(StatusCode, Json<models::Invoice>)> {
    let description = required(&input.description, "description")?;
    check_amount(input.amount)?;
    let player = invoiced_player(&state, &input.player_id).await?;

    let now = Utc::now();
    let created = invoice::ActiveModel {
        id: Set(Uuid::new_v4()),
        player_id: Set(player.id),
        amount: Set(input.amount),
        description: Set(description),
        due_date: Set(input.due_date),
        is_paid: Set(input.is_paid),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    info!(
        "{} invoiced player {} for {:.2} (invoice {})",
        caller.id, player.id, created.amount, created.id
    );

    Ok((
        StatusCode::CREATED,
        Json(models::Invoice::from_model(created, Some(player))),
    ))
}

/// Replace an invoice
#[utoipa::path(
    put,
    path = "/api/invoices/{id}",
    params(
        ("id" = String, Path, description = "Invoice ID")
    ),
    request_body = InvoiceInput,
    responses(
        (status = 200, description = "Invoice updated", body = models::Invoice),
        (status = 400, description = "Invalid input or unknown player", body = ErrorResponse),
        (status = 403, description = "ADMIN or AGENT role required", body = ErrorResponse),
        (status = 404, description = "Invoice not found", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<InvoiceInput>,
) -> ApiResult<Json<models::Invoice>> {
    let id = parse_id(&id, "Invoice")?;

    let existing = Invoice::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice '{}' not found", id)))?;

    let description = required(&input.description, "description")?;
    check_amount(input.amount)?;
    let player = invoiced_player(&state, &input.player_id).await?;

    let mut active: invoice::ActiveModel = existing.into();
    active.player_id = Set(player.id);
    active.amount = Set(input.amount);
    active.description = Set(description);
    active.due_date = Set(input.due_date);
    active.is_paid = Set(input.is_paid);
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    info!("{} updated invoice {}", caller.id, id);

    Ok(Json(models::Invoice::from_model(updated, Some(player))))
}

/// Delete an invoice
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    params(
        ("id" = String, Path, description = "Invoice ID")
    ),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 404, description = "Invoice not found", body = ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "Invoice")?;

    let result = Invoice::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Invoice '{}' not found", id)));
    }

    info!("{} deleted invoice {}", caller.id, id);
    Ok(StatusCode::NO_CONTENT)
}
