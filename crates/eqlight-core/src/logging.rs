//! Logging configuration
//!
//! Only describes where and how much to log. Installing the subscriber is
//! the job of the binary.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::Result;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level name: trace, debug, info, warn, error, off
    pub level: String,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// How many log files to keep
    pub max_log_files: usize,
    /// File name prefix for log files
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            max_log_files: 5,
            file_prefix: "eqlight".to_string(),
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO
    pub fn parse_level(&self) -> LevelFilter {
        match self.level.trim().to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" | "warning" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            "off" => LevelFilter::OFF,
            _ => LevelFilter::INFO,
        }
    }

    /// Create the log directory if file output is enabled
    pub fn ensure_log_directory(&self) -> Result<()> {
        if self.file_output {
            fs::create_dir_all(&self.log_directory)?;
        }
        Ok(())
    }

    /// Log file path for a session started at `started`
    pub fn log_path_at(&self, started: DateTime<Local>) -> PathBuf {
        self.log_directory.join(format!(
            "{}_{}.log",
            self.file_prefix,
            started.format("%Y-%m-%d_%H-%M-%S")
        ))
    }

    /// Delete the oldest log files so at most `max_log_files - 1` remain,
    /// leaving room for the file about to be created
    pub fn cleanup_old_logs(&self) -> Result<usize> {
        if !self.log_directory.is_dir() {
            return Ok(0);
        }

        let prefix = format!("{}_", self.file_prefix);
        let mut logs: Vec<PathBuf> = fs::read_dir(&self.log_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "log")
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();

        let keep = self.max_log_files.saturating_sub(1);
        if logs.len() <= keep {
            return Ok(0);
        }

        // timestamped names sort chronologically
        logs.sort();
        let excess = logs.len() - keep;
        for path in &logs[..excess] {
            fs::remove_file(path)?;
        }
        Ok(excess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::TimeZone;

    #[test]
    fn test_parse_level() {
        let mut config = LogConfig::default();
        assert_eq!(config.parse_level(), LevelFilter::INFO);

        config.level = "DEBUG".to_string();
        assert_eq!(config.parse_level(), LevelFilter::DEBUG);

        config.level = "verbose".to_string();
        assert_eq!(config.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_log_path_format() {
        let config = LogConfig::default();
        let started = Local
            .with_ymd_and_hms(2026, 3, 4, 5, 6, 7)
            .single()
            .expect("valid time");
        let path = config.log_path_at(started);
        assert_eq!(path, PathBuf::from("logs/eqlight_2026-03-04_05-06-07.log"));
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = LogConfig {
            log_directory: dir.path().to_path_buf(),
            max_log_files: 3,
            file_output: true,
            ..Default::default()
        };

        for day in 1..=5 {
            let name = format!("eqlight_2026-01-0{}_00-00-00.log", day);
            fs::write(dir.path().join(name), b"x").expect("write");
        }
        fs::write(dir.path().join("other.log"), b"x").expect("write");

        let removed = config.cleanup_old_logs().expect("cleanup");
        assert_eq!(removed, 3);
        assert!(dir.path().join("eqlight_2026-01-05_00-00-00.log").exists());
        assert!(dir.path().join("eqlight_2026-01-04_00-00-00.log").exists());
        assert!(!dir.path().join("eqlight_2026-01-03_00-00-00.log").exists());
        assert!(dir.path().join("other.log").exists());
    }

    #[test]
    fn test_log_directory_blocked_by_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("logs");
        fs::write(&blocker, b"x").expect("write");

        let config = LogConfig {
            log_directory: blocker,
            file_output: true,
            ..Default::default()
        };
        assert!(matches!(config.ensure_log_directory(), Err(CoreError::Io(_))));
    }

    #[test]
    fn test_cleanup_missing_directory() {
        let config = LogConfig {
            log_directory: PathBuf::from("/nonexistent/eqlight/logs"),
            ..Default::default()
        };
        assert_eq!(config.cleanup_old_logs().expect("cleanup"), 0);
    }
}
