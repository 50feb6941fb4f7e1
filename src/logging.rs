//! Tracing initialisation for the launcher.
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`). When a log
//! directory is given, a daily-rolling file mirrors everything without ANSI
//! colors; hold on to the returned guard for as long as the application
//! runs, or buffered file output is lost.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "launcher.log";

/// Initialize the tracing subscriber. Call once at startup.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer().with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(stderr_layer).with(filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}
