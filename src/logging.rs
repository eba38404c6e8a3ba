use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "planner.log";

/// Route `tracing` output to a daily rolling file under `dir`. The terminal
/// belongs to the UI, so nothing goes to stdout. `RUST_LOG` overrides
/// `level` when set. Keep the returned guard alive until exit so buffered
/// lines are flushed.
pub fn init_logging(dir: &Path, level: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(dir).context("failed to create log directory")?;

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'"))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(guard)
}
