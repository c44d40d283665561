// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

fn entry(edited_at: &str, text: &str) -> HistoryEntry {
    HistoryEntry { edited_at: edited_at.to_string(), text: text.to_string(), markdown: String::new() }
}

#[test]
#[serial]
fn history_is_numbered_in_order() {
    std::env::set_var("NO_COLOR", "1");
    let out = render_history(&[
        entry("2026-03-01T10:00:00Z", "first draft\n"),
        entry("2026-03-02T09:30:00Z", ""),
    ]);
    assert_eq!(
        out,
        "#1  2026-03-01T10:00:00Z\nfirst draft\n\n#2  2026-03-02T09:30:00Z\n(no content)\n"
    );
}

#[test]
fn read_input_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topic.txt");
    std::fs::write(&path, "new body").unwrap();
    assert_eq!(read_input(&path).unwrap(), "new body");
}

#[test]
fn read_input_names_missing_file() {
    let err = read_input(std::path::Path::new("/nonexistent/topic.txt")).unwrap_err();
    assert!(format!("{err:#}").contains("reading /nonexistent/topic.txt"));
}
