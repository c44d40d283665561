// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup reconciliation of on-disk run markers.
//!
//! A previous daemon may have left runners behind. A run whose heartbeat is
//! still fresh is adopted into the execution slot; one that went stale
//! without a terminal marker is closed as aborted.

use rd_adapters::{ProcessAdapter, WorkflowClient};
use rd_core::Clock;
use rd_engine::reconcile::disk_live;
use rd_engine::Orchestrator;
use tracing::{info, warn};

/// What the startup scan did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub adopted: Vec<String>,
    pub aborted: Vec<String>,
}

pub fn reconcile_markers<P, W, C>(engine: &Orchestrator<P, W, C>) -> ReconcileSummary
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let mut summary = ReconcileSummary::default();
    let store = engine.store();
    let companies = match store.list_companies() {
        Ok(companies) => companies,
        Err(e) => {
            warn!(error = %e, "cannot list companies, skipping reconciliation");
            return summary;
        }
    };

    let now_ms = engine.now_ms();
    for company in companies {
        let markers = store.read_markers(&company);
        if !markers.is_unfinished() {
            continue;
        }

        if disk_live(&markers, now_ms, engine.limits()) {
            let started_at_ms = markers.running_ms.unwrap_or(now_ms);
            if engine.supervisor().adopt(&company, started_at_ms) {
                summary.adopted.push(company.to_string());
            } else {
                // Only one runner can hold the slot; others keep reporting
                // through their markers until they finish or go stale
                warn!(%company, "second live runner found, not adopted");
            }
            continue;
        }

        match store.abort_unfinished(&company) {
            Ok(true) => {
                info!(%company, "stale run closed as aborted");
                summary.aborted.push(company.to_string());
            }
            Ok(false) => {}
            Err(e) => warn!(%company, error = %e, "failed to close stale run"),
        }
    }

    info!(adopted = summary.adopted.len(), aborted = summary.aborted.len(), "startup reconciliation done");
    summary
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
