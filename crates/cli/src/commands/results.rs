// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd results` - stored research for one company

use std::fmt::Write as _;

use anyhow::{bail, Result};
use clap::Args;
use rd_core::{CompanyResults, TopicArtifact};

use crate::client_lifecycle::connect_or_start;
use crate::color;
use crate::output::{format_or_json, topic_progress, OutputFormat};

#[derive(Args)]
pub struct ResultsArgs {
    pub company: String,

    /// Show only this topic
    #[arg(long, short)]
    pub topic: Option<u32>,

    /// Print the markdown form instead of plain text
    #[arg(long)]
    pub markdown: bool,
}

pub async fn results(args: ResultsArgs, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let mut results = client.results(&args.company).await?;
    if let Some(index) = args.topic {
        results.items.retain(|item| item.index.get() == index);
        if results.items.is_empty() {
            bail!("no topic {index} (expected 1-{})", rd_core::TOPIC_COUNT);
        }
    }
    format_or_json(format, &results, || print!("{}", render_results(&results, args.markdown)))
}

pub(crate) fn render_results(results: &CompanyResults, markdown: bool) -> String {
    let mut out = String::new();
    let proposal = if results.has_proposal { "proposal ready" } else { "no proposal" };
    let _ = writeln!(
        out,
        "{}  {}  {}  {}",
        color::header(results.company.as_str()),
        color::job_state(results.state),
        topic_progress(&results.progress),
        color::muted(proposal)
    );
    for item in &results.items {
        out.push('\n');
        render_topic(&mut out, item, markdown);
    }
    out
}

fn render_topic(out: &mut String, item: &TopicArtifact, markdown: bool) {
    let mut title = format!("{}. {}", item.index, item.title);
    if item.edited {
        title.push_str(&format!(" (edited, {} earlier)", item.history_count));
    }
    let _ = writeln!(out, "{}", color::header(&title));

    let body = if markdown && !item.markdown.is_empty() { &item.markdown } else { &item.text };
    if body.is_empty() {
        let _ = writeln!(out, "{}", color::muted("(no content)"));
    } else {
        let _ = writeln!(out, "{}", body.trim_end());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod tests;
