//! Logging setup
//!
//! # Usage
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=drag=trace,store=debug` - scoped filtering by component target
//! - `RUST_LOG=refdesk::manager=debug` - module-level filtering
//!
//! Component targets: `store`, `persistence`, `panel`, `drag`, `resize`,
//! `manager`, `runtime`.
//!
//! # Log Files
//!
//! Logs are written to `~/.config/refdesk/logs/refdesk.log` with daily
//! rotation, always at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE: &str = "refdesk.log";

/// Console filter used when RUST_LOG is unset or invalid
pub const DEFAULT_CONSOLE_FILTER: &str = "warn";

/// Install the global subscriber: console filtered by RUST_LOG plus a daily
/// rolling debug file
pub fn init() {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
