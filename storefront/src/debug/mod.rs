//! # Logging
//!
//! File-based structured logging for the storefront client.
//!
//! - **File logging**: `logs/storefront.log`, rotated daily, non-blocking writer
//! - **Stderr mirror**: enabled with `STOREFRONT_LOG_STDERR=1`
//! - **Panic logging**: panics are recorded with location and backtrace
//!
//! ## Configuration
//!
//! - `RUST_LOG`: filter (e.g. `storefront=debug,info`)
//! - `STOREFRONT_LOG_DIR`: log directory (default `logs`)
//! - `STOREFRONT_LOG_STDERR`: `1` to mirror to stderr
//!
//! ```rust,no_run
//! let _guard = storefront::debug::init().expect("log directory not writable");
//! tracing::info!(endpoint = "/products", duration_ms = 42, "Request completed");
//! ```

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init as init_logger;

/// Initialize logging from the environment. Keep the guard alive until exit.
pub fn init() -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    init_logger(&LogConfig::from_env())
}
