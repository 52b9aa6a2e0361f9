use persistence::db::DatabaseConfig;
use serde::Deserialize;
use std::net::SocketAddr;

/// Environment variables recognized at startup, in application order.
/// `RDS_PORT` comes after `DB_PORT` so a managed-database deployment
/// that only sets `RDS_PORT` keeps working.
const ENV_BINDINGS: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_PORT", "database.port"),
    ("RDS_PORT", "database.port"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_API_PREFIX", "server.api_prefix"),
    ("LOGGING_LEVEL", "logging.level"),
    ("LOGGING_FORMAT", "logging.format"),
];

const DEFAULT_CONFIG: &str = r#"
    [server]
    host = "0.0.0.0"
    port = 8080
    api_prefix = "/api"

    [database]
    host = "localhost"
    name = ""
    user = ""
    password = ""
    port = 5432

    [logging]
    level = "info"
    format = "json"
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration: embedded defaults overridden by the process
    /// environment (`DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`,
    /// `DB_PORT`/`RDS_PORT`, plus the server and logging variables).
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        for (var, key) in ENV_BINDINGS {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(*key, value)?;
            }
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Build a configuration from defaults plus explicit overrides,
    /// without reading the process environment. Used by tests.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if !self.server.api_prefix.starts_with('/') {
            return Err(ConfigValidationError::InvalidValue(
                "API prefix must start with '/'".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid socket address")
    }
}
