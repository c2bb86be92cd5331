//! Tracing subscriber setup: stderr console output plus an optional log file

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use eqlight_core::logging::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

/// Flushes the file writer when dropped; hold it for the life of the process
pub struct LogGuard(#[allow(dead_code)] WorkerGuard);

/// Configured level as the default directive; `RUST_LOG` overrides it
fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy()
}

/// Prepare the log directory and open this session's file
fn open_log_file(config: &LogConfig) -> Result<(PathBuf, File)> {
    config
        .ensure_log_directory()
        .context("Failed to create log directory")?;
    if let Err(e) = config.cleanup_old_logs() {
        eprintln!("Warning: Failed to prune old log files: {}", e);
    }

    let path = config.log_path_at(Local::now());
    let file =
        File::create(&path).with_context(|| format!("Failed to create log file: {:?}", path))?;
    Ok((path, file))
}

/// Install the global subscriber
///
/// Returns a guard only when file output is enabled.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    // stdout carries dumps and the meter, so the console layer writes to stderr
    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(env_filter(config))
    });

    let mut log_path = None;
    let mut guard = None;
    let file_layer = if config.file_output {
        let (path, file) = open_log_file(config)?;
        let (writer, worker_guard) = tracing_appender::non_blocking(file);
        log_path = Some(path);
        guard = Some(LogGuard(worker_guard));
        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(env_filter(config)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match &log_path {
        Some(path) => tracing::info!("Logging at level {} to {:?}", config.level, path),
        None => tracing::info!("Logging at level {}", config.level),
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_prunes_old_sessions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_dir = dir.path().join("nested").join("logs");
        let config = LogConfig {
            file_output: true,
            log_directory: log_dir.clone(),
            max_log_files: 2,
            ..Default::default()
        };

        std::fs::create_dir_all(&log_dir).expect("mkdir");
        for day in 1..=3 {
            let name = format!("eqlight_2020-01-0{}_00-00-00.log", day);
            std::fs::write(log_dir.join(name), b"old").expect("write");
        }

        let (path, _file) = open_log_file(&config).expect("open");
        assert!(path.starts_with(&log_dir));
        assert!(path.exists());

        let remaining = std::fs::read_dir(&log_dir).expect("read_dir").count();
        // one old file kept plus the new session file
        assert_eq!(remaining, 2);
        assert!(log_dir.join("eqlight_2020-01-03_00-00-00.log").exists());
    }

    #[test]
    fn test_open_log_file_reports_blocked_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, b"x").expect("write");
        let config = LogConfig {
            file_output: true,
            log_directory: blocker,
            ..Default::default()
        };
        let err = open_log_file(&config).expect_err("file in the way");
        assert!(err.to_string().contains("log directory"));
    }
}
