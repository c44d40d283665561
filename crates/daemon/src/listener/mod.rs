// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Each connection carries one request and one response. Queries are
//! answered from disk and the supervisor's in-memory slot; they never wait
//! for a running job.

mod mutations;
mod query;

use std::sync::Arc;
use std::time::Instant;

use rd_adapters::{ProcessAdapter, WorkflowClient};
use rd_core::{Clock, Company, CompanyError};
use rd_engine::{EngineError, Orchestrator};
use rd_wire::{ProtocolError, Request, Response, PROTOCOL_VERSION};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::env::ipc_timeout;

/// Shared daemon context for all request handlers.
pub struct ListenCtx<P: ProcessAdapter, W: WorkflowClient, C: Clock> {
    pub engine: Orchestrator<P, W, C>,
    pub start_time: Instant,
    /// Notified when a client asks the daemon to stop
    pub shutdown: Arc<Notify>,
}

impl<P: ProcessAdapter, W: WorkflowClient, C: Clock> ListenCtx<P, W, C> {
    pub fn new(engine: Orchestrator<P, W, C>, shutdown: Arc<Notify>) -> Self {
        Self { engine, start_time: Instant::now(), shutdown }
    }
}

/// Listener task for accepting socket connections.
pub struct Listener<P: ProcessAdapter, W: WorkflowClient, C: Clock> {
    unix: UnixListener,
    ctx: Arc<ListenCtx<P, W, C>>,
    cancel: CancellationToken,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A request that could not be served
#[derive(Debug, Error)]
pub(crate) enum RequestError {
    #[error(transparent)]
    Company(#[from] CompanyError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<RequestError> for Response {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Engine(EngineError::Busy { held_by, kind }) => {
                Response::Busy { held_by: held_by.to_string(), kind }
            }
            e => {
                warn!(error = %e, "request failed");
                Response::Error { message: e.to_string() }
            }
        }
    }
}

pub(crate) type Reply = Result<Response, RequestError>;

impl<P: ProcessAdapter, W: WorkflowClient, C: Clock> Listener<P, W, C> {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx<P, W, C>>, cancel: CancellationToken) -> Self {
        Self { unix, ctx, cancel }
    }

    /// Accept connections until cancelled, one task per connection.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("listener stopped");
                    return;
                }
                result = self.unix.accept() => match result {
                    Ok((stream, _)) => {
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!(error = %e, "accept error"),
                },
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(ProtocolError::ConnectionClosed) => debug!("client disconnected"),
        ConnectionError::Protocol(ProtocolError::Timeout) => warn!("connection timeout"),
        _ => error!(error = %e, "connection error"),
    }
}

/// Serve one request on a connection.
///
/// The handler runs on its own task. If the client hangs up first the
/// response is dropped, but the handler still finishes so a started run or
/// proposal never leaves the slot half-claimed.
async fn handle_connection<R, Wr, P, W, C>(
    mut reader: R,
    mut writer: Wr,
    ctx: Arc<ListenCtx<P, W, C>>,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send + 'static,
    Wr: AsyncWrite + Unpin + Send + 'static,
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let request = rd_wire::read_request(&mut reader, ipc_timeout()).await?;

    // Status polling is frequent; keep it out of the info log
    if request.is_query() {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    let handler = tokio::spawn(async move { handle_request(request, &ctx).await });
    let response = tokio::select! {
        result = handler => result.map_err(|e| ConnectionError::Internal(e.to_string()))?,
        _ = detect_client_disconnect(&mut reader) => {
            debug!("client disconnected before response");
            return Ok(());
        }
    };

    debug!(response = ?response, "sending response");
    rd_wire::write_response(&mut writer, &response, ipc_timeout()).await?;
    Ok(())
}

/// Resolves when the client closes its end.
///
/// Clients send exactly one request and then wait, so any read completing
/// means EOF or a protocol violation.
async fn detect_client_disconnect<R: AsyncRead + Unpin>(reader: &mut R) {
    let mut buf = [0u8; 1];
    let _ = reader.read(&mut buf).await;
}

async fn handle_request<P, W, C>(request: Request, ctx: &ListenCtx<P, W, C>) -> Response
where
    P: ProcessAdapter,
    W: WorkflowClient,
    C: Clock,
{
    let reply = match request {
        Request::Ping => Ok(Response::Pong),

        Request::Hello { version } => {
            if version != PROTOCOL_VERSION {
                warn!(client = %version, daemon = PROTOCOL_VERSION, "protocol version mismatch");
            }
            Ok(Response::Hello { version: PROTOCOL_VERSION.to_string() })
        }

        Request::Status => Ok(query::daemon_status(ctx)),

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Ok(Response::ShuttingDown)
        }

        Request::GetStatus { company } => query::run_status(ctx, &company),
        Request::GetResults { company } => query::results(ctx, &company),
        Request::ListCompanies => query::companies(ctx),
        Request::TopicHistory { company, index } => query::topic_history(ctx, &company, index),
        Request::GetProposalProgress { company } => query::proposal_progress(ctx, &company),

        Request::StartRun { company, topics } => {
            mutations::start_run(ctx, &company, topics.as_deref()).await
        }
        Request::RerunTopic { company, index } => mutations::rerun_topic(ctx, &company, index).await,
        Request::DeleteResults { company } => mutations::delete_results(ctx, &company),
        Request::EditTopic { company, index, text, markdown } => {
            mutations::edit_topic(ctx, &company, index, &text, markdown.as_deref())
        }
        Request::CreateProposal { company } => mutations::create_proposal(ctx, &company).await,
    };
    reply.unwrap_or_else(Response::from)
}

fn parse_company(raw: &str) -> Result<Company, RequestError> {
    Ok(Company::parse(raw)?)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
