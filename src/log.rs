// src/log.rs
// tracing setup: compact lines on stderr for the scheduler, plus an
// append-only debug log next to the state file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

const DEFAULT_FILTER: &str = "info,ticket_watch=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. If the log file cannot be opened, logging
/// continues on stderr only. Safe to call more than once; later calls are
/// no-ops.
pub fn init(log_file: Option<&Path>) {
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(env_filter());

    let file = log_file.and_then(|path| {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).ok()?;
            }
        }
        let handle = OpenOptions::new().create(true).append(true).open(path).ok()?;
        Some(
            fmt::layer()
                .with_writer(Mutex::new(handle))
                .with_ansi(false)
                .with_filter(env_filter()),
        )
    });

    let _ = tracing_subscriber::registry().with(stderr).with(file).try_init();
}
