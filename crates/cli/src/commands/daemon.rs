// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd daemon` - background daemon management

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use rd_daemon::Config;

use crate::client::DaemonClient;
use crate::client_lifecycle::{connect_or_start, daemon_stop, find_rdd_binary};
use crate::client_queries::DaemonStatus;
use crate::color;
use crate::output::{format_elapsed, format_or_json, format_time_ago, OutputFormat};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon
    Start {
        /// Run in the foreground instead of detaching
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Stop, then start the daemon
    Restart,
    /// Show uptime and the execution slot holder
    Status,
    /// Print recent daemon log lines
    Logs {
        /// Number of lines to show
        #[arg(short = 'n', long, default_value_t = 200)]
        limit: usize,
    },
}

pub async fn daemon(args: DaemonArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        DaemonCommand::Start { foreground } => start(foreground).await,
        DaemonCommand::Stop => stop().await,
        DaemonCommand::Restart => restart().await,
        DaemonCommand::Status => status(format).await,
        DaemonCommand::Logs { limit } => logs(limit, format),
    }
}

async fn start(foreground: bool) -> Result<()> {
    if foreground {
        let binary = find_rdd_binary();
        let status = tokio::process::Command::new(&binary)
            .status()
            .await
            .map_err(|e| anyhow!("{}: {}", binary.display(), e))?;
        if !status.success() {
            return Err(anyhow!("daemon exited with {status}"));
        }
        return Ok(());
    }

    if let Ok(client) = DaemonClient::connect() {
        if let Ok(status) = client.status().await {
            println!("Daemon already running (uptime {})", format_elapsed(status.uptime_secs));
            return Ok(());
        }
    }
    connect_or_start().await?;
    println!("Daemon started");
    Ok(())
}

async fn stop() -> Result<()> {
    if daemon_stop().await? {
        println!("Daemon stopped");
    } else {
        println!("Daemon not running");
    }
    Ok(())
}

async fn restart() -> Result<()> {
    if daemon_stop().await? {
        // Grace period for the old process to release its pid lock
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    connect_or_start().await?;
    println!("Daemon restarted");
    Ok(())
}

async fn status(format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect() {
        Ok(client) => client,
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(e.into()),
    };
    let status = match client.status().await {
        Ok(status) => status,
        Err(e) if e.is_not_running() => return print_not_running(format),
        Err(e) => return Err(e.into()),
    };
    let version = client.hello().await.unwrap_or_else(|_| "unknown".to_string());

    let obj = serde_json::json!({
        "status": "running",
        "version": version,
        "pid": status.pid,
        "uptime_secs": status.uptime_secs,
        "holder": status.holder,
    });
    format_or_json(format, &obj, || print!("{}", render_daemon_status(&version, &status)))
}

fn logs(limit: usize, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let Some(path) = newest_log(&config.logs_path)? else {
        let obj = serde_json::json!({ "log_path": null, "lines": [] });
        return format_or_json(format, &obj, || {
            println!("No daemon log in {}", config.logs_path.display())
        });
    };
    let lines = read_last_lines(&path, limit)?;
    let obj = serde_json::json!({ "log_path": path, "lines": lines });
    format_or_json(format, &obj, || {
        for line in &lines {
            println!("{line}");
        }
    })
}

fn print_not_running(format: OutputFormat) -> Result<()> {
    let obj = serde_json::json!({ "status": "not_running" });
    format_or_json(format, &obj, || println!("Daemon not running"))
}

pub(crate) fn render_daemon_status(version: &str, status: &DaemonStatus) -> String {
    let mut out = format!(
        "Status: running\nVersion: {version}\nPid: {}\nUptime: {}\n",
        status.pid,
        format_elapsed(status.uptime_secs)
    );
    match &status.holder {
        Some(holder) => out.push_str(&format!(
            "Slot: {} {} for '{}' (started {} ago)\n",
            holder.kind,
            color::muted(holder.job_id.short(8)),
            color::header(&holder.company),
            format_time_ago(holder.started_at_ms)
        )),
        None => out.push_str("Slot: idle\n"),
    }
    out
}

/// Latest `daemon.log*` by name; daily rotation suffixes sort by date
pub(crate) fn newest_log(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut logs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("daemon.log"))
        })
        .collect();
    logs.sort();
    Ok(logs.pop())
}

pub(crate) fn read_last_lines(path: &Path, n: usize) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let lines: Vec<String> = BufReader::new(file).lines().collect::<std::io::Result<_>>()?;
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].to_vec())
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
