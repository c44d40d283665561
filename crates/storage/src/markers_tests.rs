// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use yare::parameterized;

fn setup() -> (TempDir, ArtifactStore, Company) {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    (dir, store, Company::parse("acme").unwrap())
}

#[test]
fn no_markers_for_unknown_company() {
    let (_dir, store, acme) = setup();
    assert_eq!(store.read_markers(&acme), MarkerSnapshot::default());
}

#[test]
fn init_sets_running_and_heartbeat() {
    let (_dir, store, acme) = setup();
    store.init_markers(&acme).unwrap();

    let markers = store.read_markers(&acme);
    assert!(markers.running_ms.is_some());
    assert!(markers.heartbeat_ms.is_some());
    assert_eq!(markers.terminal(), None);
    assert!(markers.is_unfinished());
}

#[test]
fn init_clears_previous_terminal_marker() {
    let (_dir, store, acme) = setup();
    store.init_markers(&acme).unwrap();
    store.finish_markers(&acme, TerminalMarker::Aborted).unwrap();
    store.init_markers(&acme).unwrap();

    let markers = store.read_markers(&acme);
    assert!(!markers.aborted);
    assert!(!markers.done);
}

#[parameterized(
    done = { TerminalMarker::Done },
    aborted = { TerminalMarker::Aborted },
)]
fn finish_leaves_exactly_one_terminal_marker(outcome: TerminalMarker) {
    let (_dir, store, acme) = setup();
    store.init_markers(&acme).unwrap();
    store.finish_markers(&acme, outcome).unwrap();

    let markers = store.read_markers(&acme);
    assert_eq!(markers.terminal(), Some(outcome));
    assert!(!(markers.done && markers.aborted));
    assert_eq!(markers.running_ms, None);
    assert_eq!(markers.heartbeat_ms, None);
    assert!(!markers.is_unfinished());
}

#[test]
fn finishing_twice_with_different_outcomes_keeps_one() {
    let (_dir, store, acme) = setup();
    store.finish_markers(&acme, TerminalMarker::Done).unwrap();
    store.finish_markers(&acme, TerminalMarker::Aborted).unwrap();
    let markers = store.read_markers(&acme);
    assert!(markers.aborted);
    assert!(!markers.done);
}

#[test]
fn heartbeat_touch_refreshes_mtime() {
    let (_dir, store, acme) = setup();
    store.init_markers(&acme).unwrap();
    let before = store.read_markers(&acme).heartbeat_ms.unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));
    store.touch_heartbeat(&acme).unwrap();
    let after = store.read_markers(&acme).heartbeat_ms.unwrap();
    assert!(after >= before);
}

#[test]
fn abort_unfinished_only_touches_open_runs() {
    let (_dir, store, acme) = setup();
    assert!(!store.abort_unfinished(&acme).unwrap());
    assert!(!store.exists(&acme), "must not create a directory for unknown companies");

    store.init_markers(&acme).unwrap();
    assert!(store.abort_unfinished(&acme).unwrap());
    assert_eq!(store.read_markers(&acme).terminal(), Some(TerminalMarker::Aborted));

    // already terminal
    assert!(!store.abort_unfinished(&acme).unwrap());
}
