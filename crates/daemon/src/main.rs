// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rdd`: the research desk daemon.

use std::sync::Arc;

use anyhow::Context;
use rd_daemon::lifecycle::{reconcile_markers, startup};
use rd_daemon::{logging, Config, ListenCtx, Listener, StartupResult};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::load()?;
    let _log_guard = logging::init_daemon(&config.logs_path)
        .with_context(|| format!("cannot create log directory {}", config.logs_path.display()))?;

    let engine = config.engine()?;
    let StartupResult { mut daemon, listener } = match startup(&config).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "startup failed");
            return Err(e.into());
        }
    };

    reconcile_markers(&engine);

    let shutdown = Arc::new(Notify::new());
    let cancel = CancellationToken::new();
    let ctx = Arc::new(ListenCtx {
        engine,
        start_time: daemon.start_time,
        shutdown: Arc::clone(&shutdown),
    });
    let listener_task = tokio::spawn(Listener::new(listener, ctx, cancel.clone()).run());

    // The CLI waits for this line before its first request
    println!("READY");

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = shutdown.notified() => info!("shutdown requested"),
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
        _ = sigterm.recv() => info!("terminated"),
    }

    cancel.cancel();
    let _ = listener_task.await;
    daemon.shutdown()?;
    Ok(())
}
