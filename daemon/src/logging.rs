use std::env;
use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Logs to stdout, and also to a daily-rolling `quotey.log` when
/// `QUOTEY_LOG_DIR` is set. Keep the returned guard alive until exit.
pub fn init_tracing() -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false));

    let Some(dir) = env::var_os("QUOTEY_LOG_DIR") else {
        registry.init();
        return Ok(None);
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.to_string_lossy()))?;
    let appender = tracing_appender::rolling::daily(&dir, "quotey.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true),
        )
        .init();
    Ok(Some(guard))
}
