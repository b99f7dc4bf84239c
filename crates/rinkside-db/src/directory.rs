//! Account directory: the lookups the authorization layer needs
//!
//! The guard resolves a token subject to its *current* role through this
//! trait on every request, so it never depends on the ORM directly.

use async_trait::async_trait;
use rinkside_auth::Role;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{prelude::User, user};

/// Directory view of an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

impl From<user::Model> for Account {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
            email: model.email,
            role: model.role.into(),
            password_hash: model.password_hash,
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Account directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DbErr> for DirectoryError {
    fn from(err: DbErr) -> Self {
        DirectoryError::Unavailable(err.to_string())
    }
}

/// Lookup-only access to user accounts
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Find an account by its id. Ids that are not valid account ids resolve to `None`.
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, DirectoryError>;

    /// Find an account by email (case-insensitive, surrounding whitespace ignored)
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DirectoryError>;
}

/// Normalise an email the way it is stored
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// [`AccountDirectory`] backed by the `users` table
#[derive(Clone)]
pub struct SeaOrmDirectory {
    db: DatabaseConnection,
}

impl SeaOrmDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountDirectory for SeaOrmDirectory {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, DirectoryError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let model = User::find_by_id(uuid).one(&self.db).await?;
        Ok(model.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DirectoryError> {
        let model = User::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?;
        Ok(model.map(Account::from))
    }
}
