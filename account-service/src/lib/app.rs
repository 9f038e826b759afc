use std::str::FromStr;
use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenGenerator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::domain::user::service::AuthService;
use crate::domain::user::validation::Validator;
use crate::outbound::repositories::SqliteUserRepository;

/// Fully wired authentication service and the pool backing it.
pub struct Application {
    pub auth_service: Arc<AuthService<SqliteUserRepository>>,
    pub pool: SqlitePool,
}

impl Application {
    /// Connect storage, apply migrations, and compose the use case.
    pub async fn build(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            service = "account-service",
            version = env!("CARGO_PKG_VERSION"),
            database_url = %config.database.url,
            token_ttl_minutes = config.auth.token_ttl_minutes,
            "Building application"
        );

        let options = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);

        // In-memory databases live only as long as their connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        tracing::info!(
            max_connections = config.database.max_connections,
            database = "sqlite",
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(database = "sqlite", "Database migrations completed");

        let password_hasher = PasswordHasher::new();
        let token_generator = TokenGenerator::new();
        let authenticator = Arc::new(Authenticator::new(password_hasher, token_generator));
        let validator = Validator::new();
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_repository,
            authenticator,
            validator,
            config.auth.token_ttl(),
        ));

        Ok(Self { auth_service, pool })
    }
}
