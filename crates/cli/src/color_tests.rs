// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn styles_returns_plain_when_no_color() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");

    assert_eq!(
        format!("{:?}", styles()),
        format!("{:?}", clap::builder::styling::Styles::plain())
    );
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn header_produces_ansi_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let result = header("foo");
    assert!(result.contains("\x1b[38;5;74m"), "expected ANSI header color");
    assert!(result.contains("foo"));
    assert!(result.ends_with("\x1b[0m"), "expected ANSI reset");
    std::env::remove_var("COLOR");
}

#[test]
#[serial]
fn no_color_wins_over_color() {
    std::env::set_var("COLOR", "1");
    std::env::set_var("NO_COLOR", "1");

    assert_eq!(muted("plain"), "plain");
    assert_eq!(job_state(JobState::Running), "running");

    std::env::remove_var("COLOR");
    std::env::remove_var("NO_COLOR");
}

#[test]
#[serial]
fn job_states_use_distinct_colors() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let running = job_state(JobState::Running);
    let completed = job_state(JobState::Completed);
    assert!(running.contains(&format!("38;5;{}m", codes::RUNNING)));
    assert!(completed.contains(&format!("38;5;{}m", codes::DONE)));
    std::env::remove_var("COLOR");
}
