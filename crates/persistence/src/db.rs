//! Database connection settings.
//!
//! The store is reached with one short-lived connection per operation
//! instead of a shared pool. Each repository call opens a connection,
//! runs its statement, and drops the connection before returning, so a
//! briefly unreachable database degrades that one call and nothing else.

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Database connection settings, read from the process environment at
/// startup (`DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_PORT`).
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

impl DatabaseConfig {
    /// Builds the sqlx connect options for a single connection attempt.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}
