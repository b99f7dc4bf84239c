//! Initial schema: users, players, invoices

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create users table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Name, 255).not_null())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len(User::PasswordHash, 255).not_null())
                    .col(string_len(User::Role, 32).not_null().default("ASSISTANT"))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(User::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_email")
                    .table(User::Table)
                    .col(User::Email)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create players table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(uuid(Player::Id).primary_key())
                    .col(string_len(Player::Name, 255).not_null())
                    .col(string_len(Player::Position, 64).not_null())
                    .col(string_len(Player::Team, 255).not_null())
                    .col(date(Player::DateOfBirth).not_null())
                    .col(double(Player::Height).not_null())
                    .col(double(Player::Weight).not_null())
                    .col(string_len(Player::Nationality, 128).not_null())
                    .col(json_null(Player::Stats))
                    .col(date_null(Player::ContractStart))
                    .col(date_null(Player::ContractEnd))
                    .col(double_null(Player::ContractValue))
                    .col(
                        timestamp_with_time_zone(Player::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Player::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_players_name")
                    .table(Player::Table)
                    .col(Player::Name)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create invoices table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Invoice::Table)
                    .if_not_exists()
                    .col(uuid(Invoice::Id).primary_key())
                    .col(uuid(Invoice::PlayerId).not_null())
                    .col(double(Invoice::Amount).not_null())
                    .col(text(Invoice::Description).not_null())
                    .col(date(Invoice::DueDate).not_null())
                    .col(boolean(Invoice::IsPaid).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Invoice::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Invoice::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoices_player_id")
                            .from(Invoice::Table, Invoice::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_invoices_player_id")
                    .table(Invoice::Table)
                    .col(Invoice::PlayerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order (invoices reference players)
        manager
            .drop_table(Table::drop().table(Invoice::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Player::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

// ============================================================
// Table identifiers
// ============================================================

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Player {
    #[sea_orm(iden = "players")]
    Table,
    Id,
    Name,
    Position,
    Team,
    DateOfBirth,
    Height,
    Weight,
    Nationality,
    Stats,
    ContractStart,
    ContractEnd,
    ContractValue,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoice {
    #[sea_orm(iden = "invoices")]
    Table,
    Id,
    PlayerId,
    Amount,
    Description,
    DueDate,
    IsPaid,
    CreatedAt,
    UpdatedAt,
}
