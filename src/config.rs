use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_COVERAGE_DAYS: i32 = 7;
const DEFAULT_SAFETY_STOCK: i32 = 5;

/// Default reorder policy applied when a request does not override it.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ReplenishmentDefaults {
    /// Days of forward demand an order should cover
    #[serde(default = "default_coverage_days")]
    #[validate(range(min = 1))]
    pub coverage_days: i32,

    /// Extra buffer units added on top of projected demand
    #[serde(default = "default_safety_stock")]
    #[validate(range(min = 0))]
    pub safety_stock: i32,
}

impl Default for ReplenishmentDefaults {
    fn default() -> Self {
        Self {
            coverage_days: default_coverage_days(),
            safety_stock: default_safety_stock(),
        }
    }
}

/// Application configuration with validation
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL (Postgres in deployment, sqlite in tests)
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1024, max = 65535))]
    pub port: u16,

    /// Application environment ("development", "production", ...)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Default reorder policy parameters
    #[serde(default)]
    #[validate]
    pub replenishment: ReplenishmentDefaults,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_coverage_days() -> i32 {
    DEFAULT_COVERAGE_DAYS
}

fn default_safety_stock() -> i32 {
    DEFAULT_SAFETY_STOCK
}

impl AppConfig {
    /// Socket address string for the HTTP listener.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Loads configuration from layered sources: `config/default.toml`, an
/// environment-specific file, and `APP__`-prefixed environment variables
/// (e.g. `APP__DATABASE_URL`), later sources overriding earlier ones.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let cfg = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = cfg.try_deserialize()?;
    app_config
        .validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;

    info!(
        environment = %app_config.environment,
        port = app_config.port,
        "Configuration loaded"
    );
    Ok(app_config)
}

/// Initializes the global tracing subscriber. `RUST_LOG` overrides the
/// configured level when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("restock_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    let filter = EnvFilter::new(filter_directive);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let defaults = ReplenishmentDefaults::default();
        assert_eq!(defaults.coverage_days, 7);
        assert_eq!(defaults.safety_stock, 5);
    }

    #[test]
    fn rejects_out_of_range_port() {
        let cfg = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            host: default_host(),
            port: 80,
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            replenishment: ReplenishmentDefaults::default(),
        };
        assert!(cfg.validate().is_err());
    }
}
