//! Persistence for accounts, players and invoices

pub mod directory;
pub mod entities;
pub mod migrator;

pub use directory::{normalize_email, Account, AccountDirectory, DirectoryError, SeaOrmDirectory};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// Connect to the database at `database_url` (sqlite or postgres)
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    info!("Connected to database ({:?})", db.get_database_backend());
    Ok(db)
}

/// Apply all pending migrations
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migrator::Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}
