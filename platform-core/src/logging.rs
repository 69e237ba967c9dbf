//! Structured logging system.
//!
//! The SDK only emits `tracing` events; installing a subscriber is left to
//! the application. These helpers install a `tracing-subscriber` registry
//! configured from a [`LogConfig`]. `RUST_LOG` always overrides the level.
//!
//! Request spans carry `data_id`, `version`, the attempt number and the
//! pooled connection id. The shared secret is never recorded.

use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Trace level: most detailed debugging information.
    Trace,
    /// Debug level: pool and retry decisions.
    Debug,
    /// Info level: lifecycle events.
    Info,
    /// Warn level: non-200 responses and retried failures.
    Warn,
    /// Error level: error information.
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON lines for log shippers.
    Json,
}

/// Log configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level for the SDK crates.
    pub level: LogLevel,
    /// Log format.
    pub format: LogFormat,
    /// Whether to show timestamps.
    pub show_time: bool,
    /// Whether to show thread IDs.
    pub show_thread_ids: bool,
    /// Whether to show target module.
    pub show_target: bool,
    /// Whether to show span events (enter/close).
    pub show_span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            show_time: true,
            show_thread_ids: false,
            show_target: true,
            show_span_events: false,
        }
    }
}

impl LogConfig {
    /// Creates a log configuration for development environments.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            show_span_events: true,
            ..Default::default()
        }
    }

    /// Creates a log configuration for production environments.
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            show_thread_ids: true,
            ..Default::default()
        }
    }

    /// Creates a log configuration for test environments.
    pub fn test() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            show_time: false,
            show_thread_ids: false,
            show_target: false,
            show_span_events: false,
        }
    }

    /// Builds the default filter directive for the SDK crates.
    pub fn filter_directive(&self) -> String {
        format!(
            "platform_core={level},platform_gateway={level},platform_sdk={level}",
            level = self.level
        )
    }
}

fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.filter_directive()))
}

fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let span_events = if config.show_span_events {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let layer = fmt::layer()
        .with_thread_ids(config.show_thread_ids)
        .with_target(config.show_target)
        .with_span_events(span_events);

    match (config.format, config.show_time) {
        (LogFormat::Pretty, true) => layer.pretty().boxed(),
        (LogFormat::Pretty, false) => layer.pretty().without_time().boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
        (LogFormat::Json, true) => layer.json().boxed(),
        (LogFormat::Json, false) => layer.json().without_time().boxed(),
    }
}

fn build(config: &LogConfig) -> impl SubscriberInitExt {
    tracing_subscriber::registry().with(fmt_layer(config).with_filter(env_filter(config)))
}

/// Initializes the logging system.
///
/// # Panics
///
/// Panics if a global subscriber is already installed. Use
/// [`try_init_logging`] where that can happen.
///
/// # Examples
///
/// ```no_run
/// use platform_core::logging::{init_logging, LogConfig};
///
/// init_logging(&LogConfig::development());
/// ```
pub fn init_logging(config: &LogConfig) {
    build(config).init();
}

/// Attempts to initialize the logging system.
///
/// Returns an error instead of panicking when a subscriber is already set,
/// so tests can call it repeatedly.
pub fn try_init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    build(config).try_init()
}
