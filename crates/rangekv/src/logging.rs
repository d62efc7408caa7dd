//! Structured logging bootstrap.
//!
//! Operations log their context with `tracing` macros; this module only
//! installs the subscriber.

use tracing_subscriber::EnvFilter;

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (for development).
    Pretty,
    /// Compact format without colors.
    Compact,
    /// JSON format (for production).
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) { LogFormat::Pretty } else { LogFormat::Json }
    }
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Whether to include file/line numbers.
    pub include_location: bool,
    /// Whether to include the target module.
    pub include_target: bool,
    /// Environment filter (e.g. `"info,rangekv=debug"`).
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            include_location: cfg!(debug_assertions),
            include_target: true,
            filter: None,
        }
    }
}

/// Initialize structured logging.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter = if let Some(filter) = config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rangekv=debug"))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Pretty => subscriber
            .pretty()
            .try_init()
            .map_err(|err| anyhow::anyhow!("Failed to initialize pretty logger: {err}"))?,
        LogFormat::Compact => subscriber
            .compact()
            .try_init()
            .map_err(|err| anyhow::anyhow!("Failed to initialize compact logger: {err}"))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| anyhow::anyhow!("Failed to initialize JSON logger: {err}"))?,
    }

    tracing::debug!(format = ?config.format, "logging initialized");
    Ok(())
}
