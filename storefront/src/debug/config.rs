//! Logging configuration from environment variables

use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for the rolling log file
    pub log_dir: PathBuf,
    /// File name prefix inside `log_dir`
    pub file_name: String,
    /// Filter used when `RUST_LOG` is unset (e.g. "storefront=debug,info")
    pub log_level: String,
    /// Mirror log lines to stderr
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_name: "storefront.log".to_string(),
            log_level: "storefront=info,warn".to_string(),
            stderr: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_dir: std::env::var("STOREFRONT_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_name: defaults.file_name,
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            stderr: std::env::var("STOREFRONT_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(&self.file_name)
    }
}
