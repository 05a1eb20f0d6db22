use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable that overrides `log.filter`.
pub const LOG_ENV: &str = "REELS_LOG";

/// Routes `tracing` output to the log file; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(cfg: &LogConfig) -> Result<Option<WorkerGuard>> {
    let Some(path) = cfg.file.as_ref() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("log: failed to create directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("log: failed to open {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("log: install subscriber")?;

    tracing::info!("reels-tui v{} starting", crate::VERSION);
    Ok(Some(guard))
}

/// Like [`init`], but a log file that cannot be opened only costs the log:
/// the warning goes to stderr and the app carries on without a subscriber.
pub fn init_or_warn(cfg: &LogConfig) -> Option<WorkerGuard> {
    match init(cfg) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    }
}
