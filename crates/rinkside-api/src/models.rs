use chrono::{DateTime, NaiveDate, Utc};
use rinkside_auth::Role;
use rinkside_db::{entities, Account};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("healthy" or "degraded")
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

// ============================================================================
// Authentication Models
// ============================================================================

/// Self-service signup request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Display name
    pub name: String,
    /// Email address (must be unique)
    pub email: String,
    /// Password
    pub password: String,
    /// Requested role (defaults to ASSISTANT)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "ASSISTANT")]
    pub role: Option<Role>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Successful login or signup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Authenticated user
    pub user: User,
    /// Session token, sent back as `Authorization: Bearer <token>`
    pub token: String,
    /// Token expiration timestamp
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// User Models
// ============================================================================

/// User information (never includes the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// User UUID
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role
    #[schema(value_type = String, example = "AGENT")]
    pub role: Role,
}

impl From<Account> for User {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
        }
    }
}

impl From<entities::user::Model> for User {
    fn from(model: entities::user::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            email: model.email,
            role: model.role.into(),
        }
    }
}

/// List of users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    pub users: Vec<User>,
    pub total: usize,
}

/// Admin request to create a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[schema(value_type = String, example = "AGENT")]
    pub role: Role,
}

/// Admin request to update a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "AGENT")]
    pub role: Role,
    /// New password (unchanged when omitted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ============================================================================
// Player Models
// ============================================================================

/// Player represented by the agency
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: String,
    pub team: String,
    pub date_of_birth: NaiveDate,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub nationality: String,
    /// Free-form statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub stats: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_value: Option<f64>,
}

impl From<entities::player::Model> for Player {
    fn from(model: entities::player::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            position: model.position,
            team: model.team,
            date_of_birth: model.date_of_birth,
            height: model.height,
            weight: model.weight,
            nationality: model.nationality,
            stats: model.stats,
            contract_start: model.contract_start,
            contract_end: model.contract_end,
            contract_value: model.contract_value,
        }
    }
}

/// Create or replace a player
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerInput {
    pub name: String,
    pub position: String,
    pub team: String,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub nationality: String,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub stats: Option<serde_json::Value>,
    #[serde(default)]
    pub contract_start: Option<NaiveDate>,
    #[serde(default)]
    pub contract_end: Option<NaiveDate>,
    #[serde(default)]
    pub contract_value: Option<f64>,
}

/// List of players
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerList {
    pub players: Vec<Player>,
    pub total: usize,
}

// ============================================================================
// Invoice Models
// ============================================================================

/// Invoice issued to a player
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: String,
    pub player_id: String,
    /// Name of the invoiced player (when the player still exists)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    pub amount: f64,
    pub description: String,
    pub due_date: NaiveDate,
    pub is_paid: bool,
}

impl Invoice {
    pub fn from_model(
        model: entities::invoice::Model,
        player: Option<entities::player::Model>,
    ) -> Self {
        Self {
            id: model.id.to_string(),
            player_id: model.player_id.to_string(),
            player_name: player.map(|p| p.name),
            amount: model.amount,
            description: model.description,
            due_date: model.due_date,
            is_paid: model.is_paid,
        }
    }
}

/// Create or replace an invoice
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceInput {
    pub player_id: String,
    pub amount: f64,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
}

/// List of invoices
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceList {
    pub invoices: Vec<Invoice>,
    pub total: usize,
}
