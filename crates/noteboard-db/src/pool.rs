//! Connection pool for the notes database.
//!
//! One pool is built at startup and handed to [`Database`](crate::Database);
//! repositories only ever clone it.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use tracing::info;

use noteboard_core::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a query waits for a free connection.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Schema searched before `public` on every connection. Tests use this
    /// to isolate their tables.
    pub schema: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            schema: None,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n.max(1);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// Schema names are spliced into `SET search_path`, so only plain
/// identifiers are accepted.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout);

    if let Some(schema) = config.schema.clone() {
        if !is_plain_identifier(&schema) {
            return Err(Error::Config(format!("invalid schema name: {schema:?}")));
        }
        options = options.after_connect(move |conn, _meta| {
            let statement = format!("SET search_path TO {schema}, public");
            Box::pin(async move {
                conn.execute(statement.as_str()).await?;
                Ok(())
            })
        });
    }

    let pool = options
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        schema = config.schema.as_deref().unwrap_or("public"),
        duration_ms = start.elapsed().as_millis() as u64,
        "Notes database pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_min_within_max() {
        let config = PoolConfig::new().max_connections(0).schema("test_notes");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.schema.as_deref(), Some("test_notes"));
    }

    #[test]
    fn schema_names_must_be_plain_identifiers() {
        assert!(is_plain_identifier("test_abc123"));
        assert!(is_plain_identifier("_private"));
        assert!(!is_plain_identifier("1abc"));
        assert!(!is_plain_identifier("a; DROP TABLE notes"));
        assert!(!is_plain_identifier(""));
    }

    #[tokio::test]
    async fn invalid_schema_is_rejected_before_connecting() {
        let config = PoolConfig::new().schema("bad-name");
        let err = create_pool_with_config("postgres://localhost/unused", config)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
