// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection to the `rdd` daemon.
//!
//! Every call opens a fresh socket connection, sends one request and reads
//! one response.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rd_core::JobKind;
use rd_daemon::{Config, LifecycleError};
use rd_wire::{ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running (start it with `rd daemon start`)")]
    NotRunning,

    #[error("failed to start daemon: {0}")]
    StartFailed(String),

    #[error("{0}")]
    Rejected(String),

    #[error("busy: a {kind} job for '{held_by}' is running")]
    Busy { held_by: String, kind: JobKind },

    #[error("unexpected response from daemon: {0}")]
    Unexpected(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Config(#[from] LifecycleError),
}

impl ClientError {
    pub fn is_not_running(&self) -> bool {
        matches!(self, ClientError::NotRunning)
    }
}

#[derive(Debug, Clone)]
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self { socket_path: socket_path.into() }
    }

    /// Client for the configured socket; fails fast when no socket exists
    pub fn connect() -> Result<Self, ClientError> {
        let config = Config::load()?;
        if !config.socket_path.exists() {
            return Err(ClientError::NotRunning);
        }
        Ok(Self::new(config.socket_path))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request, waiting up to the IPC timeout for the reply
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, rd_daemon::env::ipc_timeout()).await
    }

    /// Send a request, waiting up to `timeout` for the reply.
    ///
    /// `Response::Error` and `Response::Busy` come back as errors.
    pub async fn send_with_timeout(
        &self,
        request: &Request,
        timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::ConnectionRefused => ClientError::NotRunning,
            _ => ClientError::Protocol(ProtocolError::Io(e)),
        })?;
        let (mut reader, mut writer) = stream.into_split();
        rd_wire::write_request(&mut writer, request, rd_daemon::env::ipc_timeout()).await?;

        match rd_wire::read_response(&mut reader, timeout).await? {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            Response::Busy { held_by, kind } => Err(ClientError::Busy { held_by, kind }),
            response => Ok(response),
        }
    }

    pub(crate) fn reject<T>(response: Response) -> Result<T, ClientError> {
        Err(ClientError::Unexpected(format!("{response:?}")))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
