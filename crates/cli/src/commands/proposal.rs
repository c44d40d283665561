// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd proposal` - proposal generation from stored research

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use rd_core::{ProposalProgress, ProposalStatus};

use crate::client_lifecycle::connect_or_start;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, progress_bar, OutputFormat};

#[derive(Args)]
pub struct ProposalArgs {
    #[command(subcommand)]
    pub command: ProposalCommand,
}

#[derive(Subcommand)]
pub enum ProposalCommand {
    /// Generate a proposal, or print the cached one
    Create {
        company: String,

        /// Also write the proposal text to this file
        #[arg(long, short = 'f')]
        file: Option<PathBuf>,
    },
    /// Show generation progress
    Progress {
        company: String,

        /// Poll until generation finishes
        #[arg(long, short)]
        watch: bool,
    },
}

pub async fn handle(command: ProposalCommand, format: OutputFormat) -> Result<()> {
    match command {
        ProposalCommand::Create { company, file } => create(&company, file, format).await,
        ProposalCommand::Progress { company, watch } => progress(&company, watch, format).await,
    }
}

async fn create(company: &str, file: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let reply = client.create_proposal(company).await?;
    if let Some(path) = &file {
        std::fs::write(path, &reply.text).with_context(|| format!("writing {}", path.display()))?;
    }
    format_or_json(format, &reply, || {
        if reply.cached {
            eprintln!("{}", color::muted("(cached)"));
        }
        println!("{}", reply.text.trim_end());
    })
}

async fn progress(company: &str, watch: bool, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let mut last: Option<ProposalProgress> = None;
    loop {
        let progress = client.proposal_progress(company).await?;
        if last.as_ref() != Some(&progress) {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&progress)?),
                OutputFormat::Text => println!("{}", render_progress(company, &progress)),
            }
        }
        if !watch || progress.is_terminal() || progress.status == ProposalStatus::Idle {
            if watch && progress.status == ProposalStatus::Failed {
                return Err(ExitError::new(1, format!("proposal for '{company}' failed")).into());
            }
            return Ok(());
        }
        last = Some(progress);
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

pub(crate) fn render_progress(company: &str, progress: &ProposalProgress) -> String {
    let status = match progress.status {
        ProposalStatus::Completed => color::done("completed"),
        ProposalStatus::Failed => color::failed("failed"),
        other => other.to_string(),
    };
    let mut line = format!(
        "{}  {}  {}",
        color::header(company),
        status,
        progress_bar(progress.current, progress.total)
    );
    if let Some(message) = &progress.message {
        line.push_str(&format!("  {}", color::muted(message)));
    }
    line
}

#[cfg(test)]
#[path = "proposal_tests.rs"]
mod tests;
