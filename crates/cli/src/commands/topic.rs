// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rd edit` and `rd history` - hand edits to a single topic

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use rd_wire::HistoryEntry;

use crate::client_lifecycle::connect_or_start;
use crate::color;
use crate::output::{format_or_json, handle_list, OutputFormat};

#[derive(Args)]
pub struct EditArgs {
    pub company: String,

    /// Topic to edit (1-5)
    pub index: u32,

    /// New plain text
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the new plain text from a file (`-` for stdin)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Read the new markdown from a file
    #[arg(long)]
    pub markdown_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub company: String,

    /// Topic index (1-5)
    pub index: u32,
}

pub async fn edit(args: EditArgs, format: OutputFormat) -> Result<()> {
    let text = match (args.text, &args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_input(path)?,
        (None, None) => bail!("pass --text or --file with the new content"),
    };
    let markdown = args.markdown_file.as_deref().map(read_input).transpose()?;

    let client = connect_or_start().await?;
    let topic = client.edit_topic(&args.company, args.index, text, markdown).await?;
    format_or_json(format, &topic, || {
        println!(
            "Updated topic {} for '{}' ({} earlier)",
            topic.index,
            color::header(&args.company),
            topic.history_count
        )
    })
}

pub async fn history(args: HistoryArgs, format: OutputFormat) -> Result<()> {
    let client = connect_or_start().await?;
    let entries = client.topic_history(&args.company, args.index).await?;
    handle_list(format, &entries, "No edit history", |entries, out| {
        let _ = write!(out, "{}", render_history(entries));
    })
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Oldest first, numbered from 1
pub(crate) fn render_history(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let label = format!("#{}", i + 1);
        let _ = writeln!(out, "{}  {}", color::header(&label), color::muted(&entry.edited_at));
        if entry.text.is_empty() {
            let _ = writeln!(out, "{}", color::muted("(no content)"));
        } else {
            let _ = writeln!(out, "{}", entry.text.trim_end());
        }
    }
    out
}

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;
