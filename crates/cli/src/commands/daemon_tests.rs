// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use rd_core::{JobId, JobKind};
use rd_wire::SlotHolder;
use serial_test::serial;

use super::*;

#[test]
#[serial]
fn idle_daemon_status() {
    std::env::set_var("NO_COLOR", "1");
    let status = DaemonStatus { uptime_secs: 65, pid: 4242, holder: None };
    assert_eq!(
        render_daemon_status("0.1.0", &status),
        "Status: running\nVersion: 0.1.0\nPid: 4242\nUptime: 1m\nSlot: idle\n"
    );
}

#[test]
#[serial]
fn busy_daemon_status_names_holder() {
    std::env::set_var("NO_COLOR", "1");
    let status = DaemonStatus {
        uptime_secs: 3,
        pid: 1,
        holder: Some(SlotHolder {
            company: "acme".to_string(),
            kind: JobKind::Research,
            job_id: JobId::from_string("0123456789abcdef"),
            started_at_ms: rd_core::clock::system_epoch_ms(),
        }),
    };
    let out = render_daemon_status("0.1.0", &status);
    assert!(out.contains("Slot: research 01234567 for 'acme' (started "), "got {out}");
}

#[test]
fn newest_log_picks_latest_rotation() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["daemon.log.2026-03-01", "daemon.log.2026-03-03", "runner-acme.log"] {
        std::fs::write(dir.path().join(name), "x").unwrap();
    }
    let newest = newest_log(dir.path()).unwrap().unwrap();
    assert!(newest.ends_with("daemon.log.2026-03-03"));
}

#[test]
fn newest_log_missing_dir_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(newest_log(&dir.path().join("missing")).unwrap().is_none());
}

#[test]
fn read_last_lines_keeps_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daemon.log");
    std::fs::write(&path, "one\ntwo\nthree\n").unwrap();
    assert_eq!(read_last_lines(&path, 2).unwrap(), vec!["two", "three"]);
    assert_eq!(read_last_lines(&path, 10).unwrap().len(), 3);
}
