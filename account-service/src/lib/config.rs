use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Lifetime recorded next to each issued bearer token.
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, AUTH__TOKEN_TTL_MINUTES, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // DATABASE__URL=sqlite://... overrides database.url
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_applies_environment_overrides() {
        // The only test touching these variables, so parallel tests cannot race on them.
        env::set_var("AUTH__TOKEN_TTL_MINUTES", "15");
        env::set_var("DATABASE__URL", "sqlite::memory:");

        let config = Config::load();

        env::remove_var("AUTH__TOKEN_TTL_MINUTES");
        env::remove_var("DATABASE__URL");

        let config = config.expect("Failed to load configuration");
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert_eq!(config.database.url, "sqlite::memory:");
        // Untouched keys still come from config/default.toml.
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_token_ttl() {
        let auth = AuthConfig {
            token_ttl_minutes: 90,
        };
        assert_eq!(auth.token_ttl(), chrono::Duration::minutes(90));
    }

    #[test]
    fn test_deserialize_from_toml_source() {
        let configuration = ConfigBuilder::builder()
            .add_source(config::File::from_str(
                r#"
                [database]
                url = "sqlite::memory:"
                max_connections = 1

                [auth]
                token_ttl_minutes = 15
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.auth.token_ttl_minutes, 15);
    }
}
