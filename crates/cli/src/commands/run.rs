// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd run` and `rd rerun` - start research jobs

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::client::DaemonClient;
use crate::client_lifecycle::connect_or_start;
use crate::client_queries::StartReply;
use crate::color;
use crate::commands::status;
use crate::output::{format_or_json, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Company to research
    pub company: String,

    /// Topics to run, comma-separated (default: every topic without content)
    #[arg(long, short, value_delimiter = ',')]
    pub topics: Vec<u32>,

    /// Follow progress until the run ends
    #[arg(long, short)]
    pub wait: bool,
}

#[derive(Args)]
pub struct RerunArgs {
    pub company: String,

    /// Topic to overwrite (1-5)
    pub index: u32,

    /// Follow progress until the run ends
    #[arg(long, short)]
    pub wait: bool,
}

pub async fn run(args: RunArgs, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let topics = (!args.topics.is_empty()).then_some(args.topics);
    let reply = client.start_run(&args.company, topics).await?;
    report(&client, &args.company, reply, args.wait, format).await
}

pub async fn rerun(args: RerunArgs, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let reply = client.rerun_topic(&args.company, args.index).await?;
    report(&client, &args.company, reply, args.wait, format).await
}

async fn report(
    client: &DaemonClient,
    company: &str,
    reply: StartReply,
    wait: bool,
    format: OutputFormat,
) -> Result<()> {
    format_or_json(format, &reply, || println!("{}", render_start(company, &reply)))?;
    if wait && matches!(reply, StartReply::Started { .. }) {
        status::watch(client, company, format, Duration::from_secs(2)).await?;
    }
    Ok(())
}

pub(crate) fn render_start(company: &str, reply: &StartReply) -> String {
    match reply {
        StartReply::Started { job_id, topics } => {
            let topics = topics.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
            format!(
                "Started research for '{}' (topics {}) {}",
                color::header(company),
                topics,
                color::muted(job_id.short(8))
            )
        }
        StartReply::AlreadyComplete => {
            format!("All topics for '{}' have content, nothing to run", color::header(company))
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
