//! Server configuration.
//!
//! Environment variables (all optional):
//! - `DATABASE_URL`: PostgreSQL URL (default: postgres://localhost/noteboard)
//! - `HOST` / `PORT`: bind address (default: 0.0.0.0:3000)
//! - `IDENTITY_HEADER`: header carrying the caller's user id (default: x-user-id)
//! - `VIEW_CACHE_CAPACITY`: cached views kept in memory (default: 1024)
//! - `ALLOWED_ORIGINS`: comma-separated CORS origins
//! - `SEED_BASE_CATEGORIES`: "false" skips base-category seeding (default: true)
//! - `DB_MAX_CONNECTIONS`: pool size (default: 10)

use noteboard_core::{Error, Result};
use noteboard_db::pool::DEFAULT_MAX_CONNECTIONS;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/noteboard";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";
pub const DEFAULT_VIEW_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Lowercased header name.
    pub identity_header: String,
    pub view_cache_capacity: usize,
    pub allowed_origins: Vec<String>,
    pub seed_base_categories: bool,
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            view_cache_capacity: DEFAULT_VIEW_CACHE_CAPACITY,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            seed_base_categories: true,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    ///
    /// Numeric values that do not parse are rejected rather than defaulted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let identity_header = get("IDENTITY_HEADER")
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or(defaults.identity_header);
        if !identity_header
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(Error::Config(format!(
                "IDENTITY_HEADER is not a valid header name: {identity_header}"
            )));
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_number(get("PORT"), "PORT", defaults.port)?,
            identity_header,
            view_cache_capacity: parse_number(
                get("VIEW_CACHE_CAPACITY"),
                "VIEW_CACHE_CAPACITY",
                defaults.view_cache_capacity,
            )?,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or(defaults.allowed_origins),
            seed_base_categories: get("SEED_BASE_CATEGORIES")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.seed_base_categories),
            db_max_connections: parse_number(
                get("DB_MAX_CONNECTIONS"),
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        })
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<String>, key: &str, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} must be a number, got {raw:?}"))),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
