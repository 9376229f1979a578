use crate::domain::auth::{AuthService, SessionRepository};
use crate::domain::mailer::Mailer;
use crate::domain::orders::OrderRepository;
use crate::domain::password::PasswordHashingService;
use crate::domain::users::UserRepository;
use crate::infrastructure::auth::JwtAuthService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::DbPool;
use crate::infrastructure::mailer::LogMailer;
use crate::infrastructure::password::PasswordService;
use crate::infrastructure::repositories::{
    orders::PostgresOrderRepository, sessions::PostgresSessionRepository,
    users::PostgresUserRepository,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub auth_service: Arc<dyn AuthService>,
    pub password_service: Arc<dyn PasswordHashingService>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Postgres-backed state.
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let auth_service = Arc::new(JwtAuthService::new(&config.jwt));

        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
            orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
            auth_service,
            password_service: Arc::new(PasswordService::new(config.bcrypt_cost)),
            mailer: Arc::new(LogMailer),
            config: Arc::new(config),
            pool,
        }
    }

    /// State assembled from explicit collaborators.
    pub fn from_parts(
        pool: DbPool,
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        orders: Arc<dyn OrderRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            auth_service: Arc::new(JwtAuthService::new(&config.jwt)),
            password_service: Arc::new(PasswordService::new(config.bcrypt_cost)),
            config: Arc::new(config),
            pool,
            users,
            sessions,
            orders,
            mailer,
        }
    }
}
