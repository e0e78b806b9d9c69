//! Tracing setup for the server binary.
//!
//! - `LOG_FORMAT`: `json` or `text` (default)
//! - `LOG_FILE`: also write to this file, rotated daily
//! - `LOG_ANSI`: force ANSI colors on or off
//! - `RUST_LOG`: filter, defaulting to [`DEFAULT_FILTER`]

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "noteboard_api=debug,noteboard_db=info,tower_http=debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub ansi: Option<bool>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            format,
            file: lookup("LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            ansi: lookup("LOG_ANSI").map(|v| v == "true" || v == "1"),
        }
    }

    /// Install the global subscriber. Keep the guard alive for the life of
    /// the process or buffered file output is lost.
    pub fn init(&self) -> Option<WorkerGuard> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
        let registry = tracing_subscriber::registry().with(filter);

        let Some(path) = &self.file else {
            let ansi = self.ansi;
            match self.format {
                LogFormat::Json => registry.with(fmt::layer().json()).init(),
                LogFormat::Text => {
                    let mut layer = fmt::layer();
                    if let Some(ansi) = ansi {
                        layer = layer.with_ansi(ansi);
                    }
                    registry.with(layer).init();
                }
            }
            return None;
        };

        let dir = path.parent().unwrap_or(Path::new("."));
        let name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("noteboard-api.log");
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));

        match self.format {
            LogFormat::Json => registry.with(fmt::layer().json().with_writer(writer)).init(),
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(self.ansi.unwrap_or(false)),
                )
                .init(),
        }
        Some(guard)
    }
}
