// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.
//!
//! Numeric settings that fail to parse fall back to their default with a
//! warning. Missing API keys are not an error here; the operation that needs
//! the key fails when it runs.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use rd_adapters::{DifyConfig, RetryPolicy};
use rd_engine::{Limits, RunnerSettings};
use tracing::warn;

use crate::lifecycle::LifecycleError;

/// Name of the worker binary the daemon spawns
pub const RUNNER_BINARY_NAME: &str = "rd-runner";

/// Resolve state directory: RD_STATE_DIR > XDG_STATE_HOME/rd > ~/.local/state/rd
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("RD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("rd"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/rd"))
}

/// Artifact store root: OUTPUTS_ROOT > <state_dir>/outputs
pub fn outputs_root(state_dir: &Path) -> PathBuf {
    match std::env::var("OUTPUTS_ROOT") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => state_dir.join("outputs"),
    }
}

/// Default IPC timeout
pub fn ipc_timeout() -> Duration {
    Duration::from_millis(parse_var("RD_IPC_TIMEOUT_MS", 5_000))
}

/// Tracing filter directive
pub fn log_filter() -> String {
    std::env::var("RD_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

/// Runner executable: RD_RUNNER_BINARY > `rd-runner` next to the current executable
pub fn runner_binary() -> PathBuf {
    if let Ok(path) = std::env::var("RD_RUNNER_BINARY") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(RUNNER_BINARY_NAME)))
        .unwrap_or_else(|| PathBuf::from(RUNNER_BINARY_NAME))
}

pub fn limits() -> Limits {
    let defaults = Limits::default();
    Limits {
        heartbeat_stale: secs_var("HEARTBEAT_STALE_SECONDS", defaults.heartbeat_stale),
        max_run: secs_var("MAX_RUN_SECONDS", defaults.max_run),
    }
}

/// Attempts per workflow call and the fixed wait between them
pub fn retry_policy() -> RetryPolicy {
    let defaults = RetryPolicy::default();
    RetryPolicy::new(
        parse_var("DIFY_MAX_RETRIES", defaults.max_attempts),
        secs_var("DIFY_RETRY_BACKOFF_SECONDS", defaults.backoff),
    )
}

pub fn runner_settings() -> RunnerSettings {
    let defaults = RunnerSettings::default();
    RunnerSettings {
        retry: retry_policy(),
        inter_delay: secs_var("DIFY_INTER_QUERY_DELAY_SECONDS", defaults.inter_delay),
        heartbeat_interval: secs_var("HEARTBEAT_INTERVAL_SECONDS", defaults.heartbeat_interval),
    }
}

pub fn dify_config() -> DifyConfig {
    let defaults = DifyConfig::default();
    DifyConfig {
        base_url: string_var("DIFY_BASE_URL").unwrap_or(defaults.base_url),
        chat_api_key: string_var("DIFY_API_KEY1"),
        workflow_api_key: string_var("DIFY_API_KEY2"),
        user: string_var("DIFY_USER_ID").unwrap_or(defaults.user),
        timeout: secs_var("DIFY_TIMEOUT", defaults.timeout),
    }
}

fn string_var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn secs_var(name: &str, default: Duration) -> Duration {
    Duration::from_secs(parse_var(name, default.as_secs()))
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    parse_or_default(name, std::env::var(name).ok().as_deref(), default)
}

/// Parse a raw value, keeping `default` when it is unset or malformed
pub(crate) fn parse_or_default<T>(name: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(variable = name, value = raw, %default, "invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
