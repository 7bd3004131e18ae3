pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod users;

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use sqlx::postgres::PgPoolOptions;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, TokenService, TokenType};
pub use db::{PgUserStore, User, UserStore};
pub use users::UserService;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Arc<dyn UserStore>,
    pub tokens: TokenService,
    pub auth_service: AuthService,
    pub user_service: UserService,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        // Initialize database connection pool
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await
            .map_err(|e| AppError::DatabaseError(error::DatabaseError::ConnectionError(e.to_string())))?;

        let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(Arc::new(db_pool)));
        Self::with_store(config, store)
    }

    /// Build the state over any `UserStore`; the integration tests use this
    /// with an in-memory fake instead of a live database.
    pub fn with_store(config: Settings, store: Arc<dyn UserStore>) -> Result<Self> {
        let tokens = TokenService::from_config(&config.auth)?;
        let auth_service = AuthService::new(store.clone(), tokens.clone());
        let user_service = UserService::new(store.clone(), config.auth.bcrypt_cost);

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            auth_service,
            user_service,
        })
    }
}

/// Versioned API routes; mounted under `/api/v1` by the server and by the
/// integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(auth::handlers::login))
        .route("/auth/refresh", web::post().to(auth::handlers::refresh))
        .route("/me", web::get().to(users::me::get_me))
        .route("/me", web::put().to(users::me::update_me))
        .route("/me", web::delete().to(users::me::delete_me))
        .route("/users", web::post().to(users::handlers::create_user))
        .route("/users", web::get().to(users::handlers::list_users))
        .route("/users/{id}", web::get().to(users::handlers::get_user))
        .route("/users/{id}", web::put().to(users::handlers::update_user))
        .route("/users/{id}", web::delete().to(users::handlers::delete_user));
}
