// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup for both binaries.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::env;

fn filter() -> EnvFilter {
    EnvFilter::try_new(env::log_filter()).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to a daily-rolled `daemon.log.<date>` under `logs_dir`.
///
/// Logging stops when the returned guard is dropped.
pub fn init_daemon(logs_dir: &Path) -> Result<WorkerGuard, std::io::Error> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, "daemon.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init();
    Ok(guard)
}

/// Log to stderr; the supervisor points it at `runner-<company>.log`.
pub fn init_runner() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .try_init();
}
