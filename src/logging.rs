use crate::error::ConfigError;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable selecting the diagnostic verbosity.
pub const LOG_LEVEL_ENV: &str = "LOGGING_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Map a severity name to a tracing level filter.
///
/// Names are case-insensitive. `WARNING`, `CRITICAL`, `FATAL` and `NOTSET`
/// are accepted as aliases so existing deployments keep working.
pub fn parse_log_level(value: &str) -> Result<LevelFilter, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "NOTSET" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" | "FATAL" => Ok(LevelFilter::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(value.to_string())),
    }
}

/// Read [`LOG_LEVEL_ENV`], defaulting to `INFO` when unset.
pub fn log_level_from_env() -> Result<LevelFilter, ConfigError> {
    match std::env::var(LOG_LEVEL_ENV) {
        Ok(value) => parse_log_level(&value),
        Err(std::env::VarError::NotPresent) => parse_log_level(DEFAULT_LOG_LEVEL),
        Err(std::env::VarError::NotUnicode(raw)) => Err(ConfigError::InvalidLogLevel(
            raw.to_string_lossy().into_owned(),
        )),
    }
}

/// Setup logging with a daily rotating file and optional console output.
///
/// # Arguments
/// * `log_dir` - Directory for log files, created if missing
/// * `log_prefix` - Prefix for log files
/// * `level` - Maximum verbosity, usually from [`log_level_from_env`]
/// * `console_output` - If true, also log to the console
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
pub fn setup_logging(
    log_dir: &Utf8Path,
    log_prefix: &str,
    level: LevelFilter,
    console_output: bool,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let file_appender = rolling::daily(log_dir, log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::new(level.to_string());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, level={}, console={}",
        log_dir,
        log_prefix,
        level,
        console_output
    );

    Ok(guard)
}
