// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handlers for requests that start jobs or change stored results.

use rd_adapters::{ProcessAdapter, WorkflowClient};
use rd_core::Clock;
use rd_engine::{ProposalOutcome, StartOutcome};
use rd_wire::Response;

use super::{parse_company, ListenCtx, Reply};

pub(super) async fn start_run<P, W, C>(
    ctx: &ListenCtx<P, W, C>,
    company: &str,
    topics: Option<&[u32]>,
) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    let outcome = ctx.engine.start_run(&company, topics).await?;
    Ok(start_response(outcome, company.as_str()))
}

pub(super) async fn rerun_topic<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str, index: u32) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    let outcome = ctx.engine.rerun_topic(&company, index).await?;
    Ok(start_response(outcome, company.as_str()))
}

fn start_response(outcome: StartOutcome, company: &str) -> Response {
    match outcome {
        StartOutcome::Started { job_id, topics } => {
            Response::Started { job_id, topics: topics.into_iter().map(u32::from).collect() }
        }
        StartOutcome::Busy { held_by, kind } => Response::Busy { held_by: held_by.to_string(), kind },
        StartOutcome::AlreadyComplete => Response::AlreadyComplete { company: company.to_string() },
    }
}

pub(super) fn delete_results<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    Ok(Response::Deleted { existed: ctx.engine.delete_results(&company)? })
}

pub(super) fn edit_topic<P, W, C>(
    ctx: &ListenCtx<P, W, C>,
    company: &str,
    index: u32,
    text: &str,
    markdown: Option<&str>,
) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    Ok(Response::TopicEdited { topic: ctx.engine.edit_topic(&company, index, text, markdown)? })
}

pub(super) async fn create_proposal<P, W, C>(ctx: &ListenCtx<P, W, C>, company: &str) -> Reply
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let company = parse_company(company)?;
    let response = match ctx.engine.create_proposal(&company).await? {
        ProposalOutcome::Cached(text) => Response::Proposal { text, cached: true },
        ProposalOutcome::Created(text) => Response::Proposal { text, cached: false },
        ProposalOutcome::Busy { held_by, kind } => {
            Response::Busy { held_by: held_by.to_string(), kind }
        }
    };
    Ok(response)
}
