// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use clap::ValueEnum;
use rd_core::Progress;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Compact elapsed time: "45s", "3m", "2h", "4d"
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        s if s < 60 => format!("{s}s"),
        s if s < 3_600 => format!("{}m", s / 60),
        s if s < 86_400 => format!("{}h", s / 3_600),
        s => format!("{}d", s / 86_400),
    }
}

/// Time since `epoch_ms` as relative time, "-" when unset
pub fn format_time_ago(epoch_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    let now_ms = rd_core::clock::system_epoch_ms();
    format_elapsed(now_ms.saturating_sub(epoch_ms) / 1000)
}

/// Fixed-width bar with a count, e.g. `[###--] 3/5`
pub fn progress_bar(completed: u32, total: u32) -> String {
    const WIDTH: u32 = 5;
    let filled = if total == 0 { 0 } else { (completed.min(total) * WIDTH) / total };
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled as usize),
        "-".repeat((WIDTH - filled) as usize),
        completed,
        total
    )
}

pub fn topic_progress(progress: &Progress) -> String {
    progress_bar(progress.completed, progress.total)
}

/// Print a list as JSON, or as text via `render_text` (`empty_msg` when empty).
pub fn handle_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_msg);
            } else {
                render_text(items, &mut std::io::stdout());
            }
        }
    }
    Ok(())
}

pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}
