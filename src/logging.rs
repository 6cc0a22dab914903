//! Logging setup: colored stderr plus a JSON log file.
//!
//! [`init`] is called once from `main`; nothing in the library installs a
//! subscriber on its own.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// JSON log destination, truncated on every run.
    pub file: PathBuf,
    /// Default stderr level when `RUST_LOG` is unset.
    pub stderr_level: String,
    /// Default file level when `RUST_LOG_JSON` is unset.
    pub file_level: String,
}

impl LogConfig {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            stderr_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}

/// Keeps the background file writer alive; dropping it flushes the log.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _file: WorkerGuard,
}

fn filter(env_var: &str, default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(env_var).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the subscriber for this process.
pub fn init(config: &LogConfig) -> Result<LogGuard> {
    if let Some(dir) = config.file.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(&config.file)
        .with_context(|| format!("failed to open log file {}", config.file.display()))?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(filter("RUST_LOG", &config.stderr_level));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(filter("RUST_LOG_JSON", &config.file_level));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LogGuard { _file: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::new("logs/run.log");
        assert_eq!(config.file, PathBuf::from("logs/run.log"));
        assert_eq!(config.stderr_level, "info");
        assert_eq!(config.file_level, "debug");
    }

    #[test]
    fn test_init_creates_and_truncates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("autompg.log");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "previous run\n").unwrap();

        let guard = init(&LogConfig::new(&path)).unwrap();
        tracing::info!("first line");
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("previous run"));
        assert!(contents.contains("first line"));
    }
}
