// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only request handlers.

use chrono::SecondsFormat;
use rd_adapters::{ProcessAdapter, WorkflowClient};
use rd_core::Clock;
use rd_engine::Holder;
use rd_storage::EditRecord;
use rd_wire::{HistoryEntry, Response, SlotHolder};

use super::{parse_company, ListenCtx, Reply};

pub(super) fn daemon_status<P, W, C>(ctx: &ListenCtx<P, W, C>) -> Response
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    Response::Status {
        uptime_secs: ctx.start_time.elapsed().as_secs(),
        pid: std::process::id(),
        holder: ctx.engine.supervisor().holder().map(slot_holder),
    }
}

fn slot_holder(holder: Holder) -> SlotHolder {
    SlotHolder {
        company: holder.company.to_string(),
        kind: holder.kind,
        job_id: holder.job_id,
        started_at_ms: holder.started_at_ms,
    }
}

pub(super) fn run_status<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    Ok(Response::RunStatus { status: ctx.engine.status(&company)? })
}

pub(super) fn results<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    Ok(Response::Results { results: ctx.engine.results(&company)? })
}

pub(super) fn companies<P, W, C>(ctx: &ListenCtx<P, W, C>) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let companies = ctx.engine.companies()?.into_iter().map(|c| c.to_string()).collect();
    Ok(Response::Companies { companies })
}

pub(super) fn topic_history<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str, index: u32) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    let entries = ctx.engine.topic_history(&company, index)?.into_iter().map(history_entry).collect();
    Ok(Response::History { entries })
}

fn history_entry(record: EditRecord) -> HistoryEntry {
    HistoryEntry {
        edited_at: record.edited_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        text: record.text,
        markdown: record.markdown,
    }
}

pub(super) fn proposal_progress<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    Ok(Response::ProposalProgress { progress: ctx.engine.proposal_progress(&company)? })
}
