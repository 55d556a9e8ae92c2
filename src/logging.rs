//! Structured logging setup.
//!
//! Every layer of the crate logs through `tracing` macros with structured
//! fields (`request_id`, `method`, `path`, `pattern`, `status`, ...). This
//! module installs the subscriber that formats them.
//!
//! | Variable | Values | Default |
//! |---|---|---|
//! | `FRONTCTL_LOG_LEVEL` | `trace` `debug` `info` `warn` `error` | `info` |
//! | `FRONTCTL_LOG_FORMAT` | `json` `pretty` | `json` |
//! | `FRONTCTL_LOG_ASYNC` | `true` `false` | `true` |
//! | `FRONTCTL_LOG_FILTER` | comma-separated `EnvFilter` directives | none |
//! | `FRONTCTL_LOG_LOCATION` | `true` `false` | `false` |
//!
//! `RUST_LOG`, when set, replaces the level.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_LEVEL_VAR: &str = "FRONTCTL_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "FRONTCTL_LOG_FORMAT";
pub const LOG_ASYNC_VAR: &str = "FRONTCTL_LOG_ASYNC";
pub const LOG_FILTER_VAR: &str = "FRONTCTL_LOG_FILTER";
pub const LOG_LOCATION_VAR: &str = "FRONTCTL_LOG_LOCATION";

/// JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a background thread (`tracing-appender`)
    pub async_logging: bool,
    /// Extra `EnvFilter` directives, comma-separated
    pub target_filter: Option<String>,
    /// Include file:line in every event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: true,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| {
            lookup(name)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };
        Self {
            log_level: lookup(LOG_LEVEL_VAR).unwrap_or(defaults.log_level),
            format: lookup(LOG_FORMAT_VAR)
                .map_or(defaults.format, |v| LogFormat::parse(&v)),
            async_logging: flag(LOG_ASYNC_VAR, defaults.async_logging),
            target_filter: lookup(LOG_FILTER_VAR).filter(|v| !v.trim().is_empty()),
            include_location: flag(LOG_LOCATION_VAR, defaults.include_location),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        // Connection-level noise from the HTTP server
        filter = filter.add_directive(
            "may_minihttp::http_server=warn"
                .parse()
                .context("invalid built-in log directive")?,
        );
        if let Some(extra) = &self.target_filter {
            for directive in extra.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                filter = filter.add_directive(
                    directive
                        .parse()
                        .with_context(|| format!("invalid log filter directive '{directive}'"))?,
                );
            }
        }
        Ok(filter)
    }
}

/// Install the global subscriber.
///
/// With async logging the returned guard owns the writer thread; keep it
/// alive until shutdown so buffered events are flushed.
///
/// # Errors
///
/// Fails on an invalid filter directive or if a global subscriber is
/// already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let registry = tracing_subscriber::registry().with(config.env_filter()?);

    let (writer, guard) = if config.async_logging {
        let (nb, guard) = tracing_appender::non_blocking(std::io::stdout());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(nb), Some(guard))
    } else {
        (
            tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout),
            None,
        )
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    registry
        .with(fmt_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}
