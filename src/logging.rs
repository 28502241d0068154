use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Env var that overrides the configured log filter.
pub const LOG_ENV: &str = "EODLOG_LOG";

pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eodlog")
}

/// Send tracing output to `<data_dir>/eodlog/eodlog.log`; the terminal belongs
/// to the TUI. Keep the returned guard alive until exit so buffered lines are
/// flushed. If the log directory cannot be set up, logging stays off and the
/// app runs anyway.
pub fn init_or_disable(default_level: &str) -> Option<WorkerGuard> {
    init_or_disable_in(&log_dir(), default_level)
}

fn init_or_disable_in(dir: &Path, default_level: &str) -> Option<WorkerGuard> {
    match init_in(dir, default_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("eodlog: logging disabled: {err:#}");
            None
        }
    }
}

fn init_in(dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, "eodlog.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritable_log_dir_disables_logging() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();

        let blocked = file.join("eodlog");
        assert!(init_in(&blocked, "info").is_err());
        assert!(init_or_disable_in(&blocked, "info").is_none());
    }
}
