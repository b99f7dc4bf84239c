//! HTTP API for the agency: accounts, players and invoices
//!
//! Every route outside the public group sits behind [`middleware::require_roles`]
//! with the role set it needs; the guard re-reads the caller's role on each request.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use rinkside_auth::{Role, SigningKey, TokenIssuer, ADMIN_ONLY, ANY_ROLE, MANAGERS};
use rinkside_db::{AccountDirectory, SeaOrmDirectory};
use sea_orm::DatabaseConnection;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub directory: Arc<dyn AccountDirectory>,
    pub issuer: TokenIssuer,
    pub allow_signup: bool,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rinkside API",
        version = "0.1.0",
        description = "REST API for managing agency accounts, players and invoices",
        contact(
            name = "Rinkside Team",
            email = "team@rinkside.dev"
        )
    ),
    paths(
        handlers::health_check,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::auth::me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::players::list_players,
        handlers::players::get_player,
        handlers::players::create_player,
        handlers::players::update_player,
        handlers::players::delete_player,
        handlers::invoices::list_invoices,
        handlers::invoices::get_invoice,
        handlers::invoices::create_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::ErrorResponse,
            models::SignupRequest,
            models::LoginRequest,
            models::AuthResponse,
            models::User,
            models::UserList,
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::Player,
            models::PlayerInput,
            models::PlayerList,
            models::Invoice,
            models::InvoiceInput,
            models::InvoiceList,
        )
    ),
    tags(
        (name = "auth", description = "Signup, login and session endpoints"),
        (name = "users", description = "User management (ADMIN)"),
        (name = "players", description = "Player records"),
        (name = "invoices", description = "Player invoices"),
        (name = "system", description = "System health and info endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS for local development origins
    pub enable_cors: bool,
    /// Key for signing and verifying session tokens
    pub signing_key: SigningKey,
    /// Whether self-service signup is open
    pub allow_signup: bool,
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, db: DatabaseConnection) -> Self {
        let directory: Arc<dyn AccountDirectory> = Arc::new(SeaOrmDirectory::new(db.clone()));
        let issuer = TokenIssuer::new(&config.signing_key);

        let state = Arc::new(AppState {
            db,
            directory,
            issuer,
            allow_signup: config.allow_signup,
        });

        Self { config, state }
    }

    /// Shared state, as seen by handlers
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Wrap `router` in the role guard for `allowed`
    fn guarded(&self, allowed: &'static [Role], router: Router<Arc<AppState>>) -> Router {
        let guard = middleware::GuardState::new(
            self.state.issuer.clone(),
            self.state.directory.clone(),
            allowed,
        );

        router
            .route_layer(axum_middleware::from_fn_with_state(
                guard,
                middleware::require_roles,
            ))
            .with_state(self.state.clone())
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let public_router = Router::new()
            .route("/api/health", get(handlers::health_check))
            .route("/api/auth/signup", post(handlers::auth::signup))
            .route("/api/auth/login", post(handlers::auth::login))
            .with_state(self.state.clone());

        // Same path may appear in several groups as long as the methods differ
        let any_role_router = self.guarded(
            ANY_ROLE,
            Router::new()
                .route("/api/auth/me", get(handlers::auth::me))
                .route("/api/players", get(handlers::players::list_players))
                .route("/api/players/{id}", get(handlers::players::get_player))
                .route("/api/invoices", get(handlers::invoices::list_invoices))
                .route("/api/invoices/{id}", get(handlers::invoices::get_invoice)),
        );

        let managers_router = self.guarded(
            MANAGERS,
            Router::new()
                .route("/api/players", post(handlers::players::create_player))
                .route("/api/players/{id}", put(handlers::players::update_player))
                .route("/api/invoices", post(handlers::invoices::create_invoice))
                .route("/api/invoices/{id}", put(handlers::invoices::update_invoice)),
        );

        let admin_router = self.guarded(
            ADMIN_ONLY,
            Router::new()
                .route(
                    "/api/users",
                    get(handlers::users::list_users).post(handlers::users::create_user),
                )
                .route(
                    "/api/users/{id}",
                    put(handlers::users::update_user).delete(handlers::users::delete_user),
                )
                .route(
                    "/api/players/{id}",
                    axum::routing::delete(handlers::players::delete_player),
                )
                .route(
                    "/api/invoices/{id}",
                    axum::routing::delete(handlers::invoices::delete_invoice),
                ),
        );

        let api_router = public_router
            .merge(any_role_router)
            .merge(managers_router)
            .merge(admin_router);

        // SwaggerUi automatically creates a route for /api/openapi.json
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router);

        let mut router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            use tower_http::cors::AllowOrigin;

            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                        || origin_str.starts_with("https://localhost:")
                        || origin_str.starts_with("https://127.0.0.1:")
                }));

            router = router.layer(cors);
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);
        if !self.config.allow_signup {
            info!("Self-service signup is disabled");
        }

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
