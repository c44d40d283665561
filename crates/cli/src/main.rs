// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `rd`: command line client for the research desk daemon.

mod client;
mod client_lifecycle;
mod client_queries;
mod color;
mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};

use crate::client::ClientError;
use crate::commands::{company, daemon, proposal, results, run, status, topic};
use crate::exit_error::{ExitError, EXIT_BUSY, EXIT_NOT_RUNNING};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "rd", version, about = "Company research and proposal desk")]
#[command(styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a company's topics in the background
    Run(run::RunArgs),
    /// Overwrite one topic with fresh research
    Rerun(run::RerunArgs),
    /// Research status for a company
    Status(status::StatusArgs),
    /// Show stored research
    Results(results::ResultsArgs),
    /// List companies with stored results
    Companies,
    /// Delete a company's stored results
    Delete(company::DeleteArgs),
    /// Replace a topic's content by hand
    Edit(topic::EditArgs),
    /// Show prior versions of an edited topic
    History(topic::HistoryArgs),
    /// Generate or inspect a proposal
    Proposal(proposal::ProposalArgs),
    /// Manage the background daemon
    Daemon(daemon::DaemonArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output;
    match cli.command {
        Commands::Run(args) => run::run(args, format).await,
        Commands::Rerun(args) => run::rerun(args, format).await,
        Commands::Status(args) => status::status(args, format).await,
        Commands::Results(args) => results::results(args, format).await,
        Commands::Companies => company::companies(format).await,
        Commands::Delete(args) => company::delete(args, format).await,
        Commands::Edit(args) => topic::edit(args, format).await,
        Commands::History(args) => topic::history(args, format).await,
        Commands::Proposal(args) => proposal::handle(args.command, format).await,
        Commands::Daemon(args) => daemon::daemon(args, format).await,
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(exit) = error.downcast_ref::<ExitError>() {
        return exit.code;
    }
    match error.downcast_ref::<ClientError>() {
        Some(ClientError::Busy { .. }) => EXIT_BUSY,
        Some(ClientError::NotRunning) => EXIT_NOT_RUNNING,
        _ => 1,
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
