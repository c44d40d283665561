// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod company;
pub mod daemon;
pub mod proposal;
pub mod results;
pub mod run;
pub mod status;
pub mod topic;
