// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run marker files.
//!
//! The runner is the single writer. `.running` and `.heartbeat` exist while a
//! run is in flight; finishing replaces them with exactly one of `.done` or
//! `.aborted`. Readers only look at presence and mtimes.

use std::path::PathBuf;

use rd_core::clock::system_epoch_ms;
use rd_core::{Company, TerminalMarker};
use tracing::info;

use crate::fs::{mtime_ms, remove_if_exists, write_atomic};
use crate::store::{ArtifactStore, StoreError};

const RUNNING: &str = ".running";
const HEARTBEAT: &str = ".heartbeat";
const DONE: &str = ".done";
const ABORTED: &str = ".aborted";

/// Point-in-time view of a company's markers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerSnapshot {
    /// mtime of `.running`, i.e. when the run started
    pub running_ms: Option<u64>,
    /// mtime of `.heartbeat`, i.e. the last liveness signal
    pub heartbeat_ms: Option<u64>,
    pub done: bool,
    pub aborted: bool,
}

impl MarkerSnapshot {
    pub fn terminal(&self) -> Option<TerminalMarker> {
        if self.done {
            Some(TerminalMarker::Done)
        } else if self.aborted {
            Some(TerminalMarker::Aborted)
        } else {
            None
        }
    }

    /// A run was started and never reached a terminal marker
    pub fn is_unfinished(&self) -> bool {
        self.running_ms.is_some() && self.terminal().is_none()
    }
}

impl ArtifactStore {
    fn marker(&self, company: &Company, name: &str) -> PathBuf {
        self.company_dir(company).join(name)
    }

    fn stamp(&self, company: &Company, name: &str) -> Result<(), StoreError> {
        let secs = system_epoch_ms() / 1000;
        write_atomic(&self.marker(company, name), secs.to_string().as_bytes())
    }

    /// Mark a run as started: clear terminal markers, stamp running and heartbeat.
    pub fn init_markers(&self, company: &Company) -> Result<(), StoreError> {
        self.ensure_company_dir(company)?;
        remove_if_exists(&self.marker(company, DONE))?;
        remove_if_exists(&self.marker(company, ABORTED))?;
        self.stamp(company, RUNNING)?;
        self.stamp(company, HEARTBEAT)
    }

    pub fn touch_heartbeat(&self, company: &Company) -> Result<(), StoreError> {
        self.stamp(company, HEARTBEAT)
    }

    /// Record the terminal outcome and drop the live-run markers.
    pub fn finish_markers(
        &self,
        company: &Company,
        outcome: TerminalMarker,
    ) -> Result<(), StoreError> {
        self.ensure_company_dir(company)?;
        let (keep, other) = match outcome {
            TerminalMarker::Done => (DONE, ABORTED),
            TerminalMarker::Aborted => (ABORTED, DONE),
        };
        remove_if_exists(&self.marker(company, other))?;
        self.stamp(company, keep)?;
        remove_if_exists(&self.marker(company, RUNNING))?;
        remove_if_exists(&self.marker(company, HEARTBEAT))
    }

    pub fn read_markers(&self, company: &Company) -> MarkerSnapshot {
        MarkerSnapshot {
            running_ms: mtime_ms(&self.marker(company, RUNNING)),
            heartbeat_ms: mtime_ms(&self.marker(company, HEARTBEAT)),
            done: self.marker(company, DONE).exists(),
            aborted: self.marker(company, ABORTED).exists(),
        }
    }

    /// Close out a run whose writer died before leaving a terminal marker.
    ///
    /// Returns whether an `.aborted` marker was written.
    pub fn abort_unfinished(&self, company: &Company) -> Result<bool, StoreError> {
        if !self.read_markers(company).is_unfinished() {
            return Ok(false);
        }
        info!(%company, "closing unfinished run with aborted marker");
        self.finish_markers(company, TerminalMarker::Aborted)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
