use std::sync::Arc;

use account_service::app::Application;
use account_service::config::AuthConfig;
use account_service::config::Config;
use account_service::config::DatabaseConfig;
use account_service::context::RequestContext;
use account_service::domain::user::service::AuthService;
use account_service::outbound::repositories::SqliteUserRepository;
use account_service::telemetry;
use sqlx::SqlitePool;

pub const TOKEN_TTL_MINUTES: i64 = 60;

/// Test application wired exactly like production, over a private in-memory database.
pub struct TestApp {
    pub service: Arc<AuthService<SqliteUserRepository>>,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn spawn() -> Self {
        telemetry::init("account_service=debug");

        // One connection, so every query sees the same in-memory database.
        let config = Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                token_ttl_minutes: TOKEN_TTL_MINUTES,
            },
        };

        let application = Application::build(&config)
            .await
            .expect("Failed to build application");

        Self {
            service: application.auth_service,
            pool: application.pool,
        }
    }

    pub fn ctx(&self) -> RequestContext {
        RequestContext::new()
    }

    /// Count stored rows, bypassing the service.
    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count users")
    }

    /// Fetch the raw stored token for an email, bypassing the service.
    pub async fn stored_token(&self, email: &str) -> Option<String> {
        sqlx::query_scalar("SELECT token FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to read token")
    }

    /// Fetch the raw stored password hash for an email, bypassing the service.
    pub async fn stored_password_hash(&self, email: &str) -> String {
        sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to read password hash")
    }
}
