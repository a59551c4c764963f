//! # Logging Utilities
//!
//! Diagnostics for dbgprint using `tracing`.
//!
//! Standard output belongs to the printer, so console logs go to
//! **stderr**. Supported:
//! - Pretty (development) or JSON (production) output
//! - `RUST_LOG` filtering
//! - An optional daily-rolling log file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dbgprint_utils::init_logging;
//!
//! // Keep the guard alive until exit or file logs may be lost.
//! let _guard = init_logging().expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: log level filter (e.g. `RUST_LOG=debug`, `RUST_LOG=dbgprint_core=trace`)
//! - `DBGPRINT_LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
//! - `DBGPRINT_LOG_FILE`: optional path to a log file

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "DBGPRINT_LOG_FORMAT";

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "DBGPRINT_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    #[default]
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level (default)
    Warn,
    /// Info level
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Keeps the background file writer alive.
///
/// Dropping it flushes and stops file logging; console logging is
/// unaffected.
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// - `RUST_LOG`: level filter, default `warn`. Printing is the product of
///   this tool, so the console stays quiet unless asked.
/// - `DBGPRINT_LOG_FORMAT`: `json` or `pretty`
/// - `DBGPRINT_LOG_FILE`: optional log file
///
/// ## Errors
///
/// Returns an error if logging is already initialized, if
/// `DBGPRINT_LOG_FORMAT` is invalid, or if the log file directory cannot be
/// created.
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    let format = match env::var(LOG_FORMAT_ENV) {
        Ok(value) => LogFormat::from_str(&value).map_err(LoggingError::InvalidFormat)?,
        Err(_) => LogFormat::Pretty,
    };

    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LogLevel>().ok())
        .map_or(Level::WARN, Into::into);

    let log_file = env::var(LOG_FILE_ENV).ok().map(PathBuf::from);
    init_logging_internal(format, default_level, log_file.as_deref(), false)
}

/// Initialize logging with explicit level and format
///
/// The level takes precedence over `RUST_LOG`. `DBGPRINT_LOG_FILE` is still
/// honored.
///
/// ## Example
///
/// ```rust,no_run
/// use dbgprint_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    let log_file = env::var(LOG_FILE_ENV).ok().map(PathBuf::from);
    init_logging_internal(format, level.into(), log_file.as_deref(), true)
}

fn init_logging_internal(
    format: LogFormat,
    level: Level,
    log_file: Option<&Path>,
    explicit: bool,
) -> Result<LoggingGuard, LoggingError>
{
    // An explicit level wins; otherwise RUST_LOG may carry module filters
    // like "dbgprint_core=trace".
    let make_filter = || {
        if explicit {
            EnvFilter::new(level.to_string())
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
        }
    };

    let console_layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(make_filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(make_filter())
            .boxed(),
    };

    let Some(file_path) = log_file else {
        Registry::default()
            .with(console_layer)
            .try_init()
            .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;
        return Ok(LoggingGuard::default());
    };

    let directory = file_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    std::fs::create_dir_all(directory)?;
    let file_name = file_path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidFile(file_path.display().to_string()))?;

    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(make_filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(make_filter())
            .boxed(),
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(LoggingGuard { _file: Some(guard) })
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Log file path has no file name
    #[error("Invalid log file: {0}")]
    InvalidFile(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
