//! File-based logging initialization

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LogConfig;

/// Initialize the logging system.
///
/// Sets up:
/// - Daily rotation of `<log_dir>/storefront.log`
/// - Non-blocking writes so request paths never wait on disk
/// - An optional stderr layer
/// - A panic hook that records panics through `tracing`
///
/// The returned guard flushes buffered lines when dropped; keep it alive for the
/// life of the process. Calling this twice leaves the first subscriber in place.
pub fn init(config: &LogConfig) -> io::Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("storefront=info,warn"));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
    });

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            log_file = %config.log_file().display(),
            log_level = %config.log_level,
            stderr = config.stderr,
            "Logging initialized"
        );
        setup_panic_hook();
    }

    Ok(guard)
}

/// Log panics with location and message before the default handler runs.
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(
            location = %location,
            message = %message,
            backtrace = %backtrace,
            "Application panic"
        );

        default_panic(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_dir: dir.path().join("nested/logs"),
            ..LogConfig::default()
        };

        let guard = init(&config).unwrap();
        assert!(config.log_dir.is_dir());
        drop(guard);
    }
}
