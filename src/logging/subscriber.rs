use super::TEXT_LOG_FILE;
use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Install the global subscriber: ANSI console plus a plain `agents.log` file.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process logs.
pub fn init_tracing(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("create log directory {}", config.dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&config.dir, TEXT_LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("parse logging.level filter")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .context("install tracing subscriber")?;

    Ok(guard)
}
