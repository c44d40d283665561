// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Research desk daemon library
//!
//! Shared by the `rdd` daemon and the `rd-runner` worker binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod logging;

pub use lifecycle::{Config, DaemonEngine, DaemonState, LifecycleError, StartupResult};
pub use listener::{ListenCtx, Listener};
