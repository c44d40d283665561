// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd-runner`: researches one company's topics, then exits.
//!
//! Spawned by `rdd`; progress is visible to the daemon only through the
//! artifact directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rd_adapters::DifyClient;
use rd_core::{Company, TopicIndex};
use rd_daemon::{env, logging, Config};
use rd_engine::run_topics;
use rd_storage::ArtifactStore;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "rd-runner", version, about = "Research a company's topics and store the answers")]
struct Args {
    /// Company to research
    #[arg(long)]
    company: String,

    /// Comma-separated topic indices, in run order
    #[arg(long, value_delimiter = ',', required = true)]
    topics: Vec<u32>,

    /// Artifact store root
    #[arg(long, env = "OUTPUTS_ROOT")]
    outputs_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    logging::init_runner();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("runner failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let company = Company::parse(&args.company)?;
    let topics = args.topics.into_iter().map(TopicIndex::new).collect::<Result<Vec<_>, _>>()?;
    let root = match args.outputs_root {
        Some(root) => root,
        None => Config::load()?.outputs_root,
    };

    let store = ArtifactStore::new(root);
    let client = DifyClient::new(env::dify_config())?;
    run_topics(&store, &client, &company, &topics, &env::runner_settings()).await?;
    Ok(())
}
