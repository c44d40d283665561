// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use rd_core::JobState;
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// Live jobs
    pub const RUNNING: u8 = 179;
    /// Finished successfully
    pub const DONE: u8 = 108;
    /// Failed or aborted
    pub const FAILED: u8 = 167;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::MUTED)))))
}

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

pub fn failed(text: &str) -> String {
    paint(codes::FAILED, text)
}

pub fn done(text: &str) -> String {
    paint(codes::DONE, text)
}

/// Job state label in its state color
pub fn job_state(state: JobState) -> String {
    let label = state.to_string();
    match state {
        JobState::Running => paint(codes::RUNNING, &label),
        JobState::Completed => paint(codes::DONE, &label),
        JobState::NotFound => paint(codes::MUTED, &label),
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
