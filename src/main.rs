//! Rinkside server - accounts, players and invoices for a sports agency

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rinkside_api::{ApiServer, ApiServerConfig};
use rinkside_auth::{hash_password, Role, SigningKey, JWT_SECRET_ENV};
use rinkside_db::{entities::user, AccountDirectory, SeaOrmDirectory};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const VERSION: &str = concat!(
    env!("GIT_TAG"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Rinkside - agency back office API
#[derive(Parser, Debug)]
#[command(name = "rinkside")]
#[command(about = "Rinkside - accounts, players and invoices for a sports agency")]
#[command(version = VERSION)]
struct Cli {
    /// Enable verbose logging (RUST_LOG takes precedence when set)
    #[arg(short, long)]
    verbose: bool,

    /// HMAC secret for signing session tokens
    #[arg(long, env = JWT_SECRET_ENV, hide_env_values = true)]
    jwt_secret: String,

    /// Database URL (sqlite:// or postgres://)
    #[arg(long, env = "RINKSIDE_DATABASE_URL", default_value = "sqlite://rinkside.db?mode=rwc")]
    database_url: String,

    /// Address to bind the HTTP API
    #[arg(long, env = "RINKSIDE_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Allow self-service signup
    #[arg(long, env = "RINKSIDE_ALLOW_SIGNUP", default_value_t = true, action = clap::ArgAction::Set)]
    allow_signup: bool,

    /// Enable CORS for localhost origins (frontend development)
    #[arg(long, env = "RINKSIDE_CORS")]
    cors: bool,

    /// Email of an admin account to create at startup if it does not exist
    #[arg(long, env = "RINKSIDE_ADMIN_EMAIL", requires = "admin_password")]
    admin_email: Option<String>,

    /// Password for the bootstrap admin account
    #[arg(long, env = "RINKSIDE_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

/// Setup logging with the specified log level
fn setup_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Create the bootstrap admin unless an account with that email exists
async fn ensure_admin(db: &DatabaseConnection, email: &str, password: &str) -> Result<()> {
    let directory = SeaOrmDirectory::new(db.clone());

    if let Some(existing) = directory.find_by_email(email).await? {
        if existing.role != Role::Admin {
            warn!(
                "Bootstrap admin {} exists with role {}; leaving it unchanged",
                existing.email, existing.role
            );
        }
        return Ok(());
    }

    let password_hash =
        hash_password(password).context("Failed to hash bootstrap admin password")?;

    let now = Utc::now();
    let created = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        name: Set("Administrator".to_string()),
        email: Set(rinkside_db::normalize_email(email)),
        password_hash: Set(password_hash),
        role: Set(Role::Admin.into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .context("Failed to create bootstrap admin")?;

    info!("Created bootstrap admin {} ({})", created.email, created.id);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Rinkside {} starting...", VERSION);

    let signing_key = SigningKey::new(cli.jwt_secret)
        .with_context(|| format!("{} must not be empty", JWT_SECRET_ENV))?;

    let db = rinkside_db::connect(&cli.database_url)
        .await
        .with_context(|| format!("Failed to connect to database {}", cli.database_url))?;
    rinkside_db::migrate(&db)
        .await
        .context("Failed to run database migrations")?;

    if let (Some(email), Some(password)) = (&cli.admin_email, &cli.admin_password) {
        ensure_admin(&db, email, password).await?;
    }

    let config = ApiServerConfig {
        bind_addr: cli.bind,
        enable_cors: cli.cors,
        signing_key,
        allow_signup: cli.allow_signup,
    };
    let server = ApiServer::new(config, db);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        _ = &mut ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        result = server.start() => {
            if let Err(e) = result {
                error!("API server error: {:#}", e);
                return Err(e);
            }
        }
    }

    info!("Rinkside stopped");
    Ok(())
}
