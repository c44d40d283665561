// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd status` - reconciled research status

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use rd_core::{JobState, RunStatus, TerminalMarker};

use crate::client::DaemonClient;
use crate::client_lifecycle::connect_or_start;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, format_time_ago, topic_progress, OutputFormat};

#[derive(Args)]
pub struct StatusArgs {
    pub company: String,

    /// Poll until the run is no longer running
    #[arg(long, short)]
    pub watch: bool,

    /// Seconds between polls with --watch
    #[arg(long, default_value_t = 2)]
    pub interval: u64,
}

pub async fn status(args: StatusArgs, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    if args.watch {
        return watch(&client, &args.company, format, Duration::from_secs(args.interval.max(1)))
            .await;
    }
    let status = client.run_status(&args.company).await?;
    format_or_json(format, &status, || println!("{}", render_status(&status)))
}

/// Print status changes until the run stops; an aborted run exits non-zero
pub async fn watch(
    client: &DaemonClient,
    company: &str,
    format: OutputFormat,
    interval: Duration,
) -> Result<()> {
    let mut last: Option<RunStatus> = None;
    loop {
        let status = client.run_status(company).await?;
        if last.as_ref() != Some(&status) {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&status)?),
                OutputFormat::Text => println!("{}", render_status(&status)),
            }
        }
        if status.state != JobState::Running {
            if status.last_outcome == Some(TerminalMarker::Aborted) {
                return Err(ExitError::new(1, format!("research for '{company}' aborted")).into());
            }
            return Ok(());
        }
        last = Some(status);
        tokio::time::sleep(interval).await;
    }
}

pub(crate) fn render_status(status: &RunStatus) -> String {
    let mut line = format!(
        "{}  {}  {}",
        color::header(status.company.as_str()),
        color::job_state(status.state),
        topic_progress(&status.progress)
    );
    if status.state == JobState::Running {
        if let Some(started) = status.started_at_ms {
            line.push_str(&format!("  started {} ago", format_time_ago(started)));
        }
        if let Some(job_id) = &status.job_id {
            line.push_str(&format!("  {}", color::muted(job_id.short(8))));
        }
    } else if let Some(outcome) = status.last_outcome {
        let label = format!("last run {outcome}");
        let label = match outcome {
            TerminalMarker::Done => color::done(&label),
            TerminalMarker::Aborted => color::failed(&label),
        };
        line.push_str(&format!("  {label}"));
    }
    line
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
