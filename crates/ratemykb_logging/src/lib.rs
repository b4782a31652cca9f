//! Shared logging setup for the ratemykb binary.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use tracing_appender::non_blocking::WorkerGuard;

const DEFAULT_LOG_FILTER: &str = "ratemykb=info,ratemykb_state_store=info";
/// Daily files kept in the logs directory.
const MAX_LOG_FILES: usize = 5;

/// Environment variable that relocates `~/.ratemykb`.
pub const HOME_ENV: &str = "RATEMYKB_HOME";

/// Logging configuration.
pub struct LogConfig<'a> {
    /// Log file prefix: `<app_name>.<date>.log`
    pub app_name: &'a str,
    /// Mirror the file filter on stderr instead of only showing warnings.
    pub verbose: bool,
}

/// Initialize tracing with a daily log file and stderr output.
///
/// Progress output belongs on stdout, so stderr only carries warnings and
/// errors unless `verbose` is set. Keep the returned guard alive until the
/// process exits; dropping it flushes the file writer.
pub fn init_logging(config: LogConfig<'_>) -> Result<WorkerGuard> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let appender = file_appender(&log_dir, config.app_name)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn file_appender(dir: &Path, app_name: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(app_name)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .with_context(|| format!("Failed to open log file in {}", dir.display()))
}

/// Get the ratemykb home directory: ~/.ratemykb
pub fn ratemykb_home() -> Result<PathBuf> {
    if let Ok(override_path) = std::env::var(HOME_ENV) {
        return Ok(PathBuf::from(override_path));
    }
    dirs::home_dir()
        .map(|home| home.join(".ratemykb"))
        .context("Could not determine home directory; set RATEMYKB_HOME")
}

/// Get the logs directory: ~/.ratemykb/logs
pub fn logs_dir() -> Result<PathBuf> {
    Ok(ratemykb_home()?.join("logs"))
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir()?;
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}
