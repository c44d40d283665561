// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn job_ids_are_unique() {
    assert_ne!(JobId::new(), JobId::new());
}

#[test]
fn short_truncates_on_char_boundary() {
    let id = JobId::from_string("abcdef");
    assert_eq!(id.short(3), "abc");
    assert_eq!(id.short(10), "abcdef");
}

#[parameterized(
    not_found = { JobState::NotFound, "not_found" },
    running = { JobState::Running, "running" },
    completed = { JobState::Completed, "completed" },
)]
fn job_state_display_matches_wire_name(state: JobState, expected: &str) {
    assert_eq!(state.to_string(), expected);
    assert_eq!(serde_json::to_string(&state).unwrap(), format!("\"{expected}\""));
}

#[test]
fn progress_of_catalog_uses_topic_count() {
    let progress = Progress::of_catalog(5);
    assert_eq!(progress, Progress { completed: 5, total: 5 });
    assert!(progress.is_complete());
    assert!(!Progress::of_catalog(2).is_complete());
}

#[test]
fn run_status_omits_absent_fields() {
    let status = RunStatus {
        company: Company::parse("acme").unwrap(),
        state: JobState::NotFound,
        progress: Progress::of_catalog(0),
        job_id: None,
        started_at_ms: None,
        last_outcome: None,
    };
    let json = serde_json::to_value(&status).unwrap();
    assert!(json.get("job_id").is_none());
    assert_eq!(json["state"], "not_found");
}
