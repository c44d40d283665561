// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

#[test]
#[serial]
fn running_shows_step_counter() {
    std::env::set_var("NO_COLOR", "1");
    assert_eq!(
        render_progress("acme", &ProposalProgress::running(2, 5)),
        "acme  running  [##---] 2/5"
    );
}

#[test]
#[serial]
fn failed_includes_message() {
    std::env::set_var("NO_COLOR", "1");
    let failed = ProposalProgress::failed(3, 5, "workflow timed out");
    assert_eq!(render_progress("acme", &failed), "acme  failed  [###--] 3/5  workflow timed out");
}

#[test]
#[serial]
fn idle_has_empty_bar() {
    std::env::set_var("NO_COLOR", "1");
    let line = render_progress("acme", &ProposalProgress::idle());
    assert!(line.starts_with("acme  idle  "), "got {line}");
}
