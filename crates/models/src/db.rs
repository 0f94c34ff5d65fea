use std::{env, time::Duration};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::debug;

const DEFAULT_URL: &str = "sqlite://custom_values.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// Read configuration from the environment, loading `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string()),
            max_connections: env_u32("DATABASE_MAX_CONNECTIONS", 10),
            min_connections: env_u32("DATABASE_MIN_CONNECTIONS", 1),
            acquire_timeout: Duration::from_secs(env_u32("DATABASE_ACQUIRE_TIMEOUT_SECS", 30) as u64),
            sqlx_logging: env::var("DATABASE_SQLX_LOGGING").is_ok(),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    connect_with_config(&DatabaseConfig::from_env()).await
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    debug!(url = %cfg.url, "connecting to database");
    let mut opts = ConnectOptions::new(&cfg.url);
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .acquire_timeout(cfg.acquire_timeout)
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    Ok(db)
}
