// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skip/overwrite decision for a run request.
//!
//! A default request resumes: only incomplete topics run, and a fully
//! complete company runs nothing. An explicit subset always reruns exactly
//! that subset, overwriting whatever content it had.

use std::collections::BTreeSet;

use rd_core::{TopicError, TopicIndex, TOPIC_COUNT};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error(transparent)]
    InvalidTopic(#[from] TopicError),
}

/// Which topics a request asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSelection {
    /// No subset, or the full catalog
    Default,
    /// A strict subset to rerun unconditionally
    Explicit(BTreeSet<TopicIndex>),
}

impl TopicSelection {
    /// Interpret the raw topic list of a request.
    ///
    /// Duplicates collapse. An empty list or one naming every topic is the
    /// default selection.
    pub fn from_request(topics: Option<&[u32]>) -> Result<Self, PlanError> {
        let Some(topics) = topics else {
            return Ok(TopicSelection::Default);
        };
        let set = topics
            .iter()
            .map(|&i| TopicIndex::new(i))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if set.is_empty() || set.len() == TOPIC_COUNT {
            Ok(TopicSelection::Default)
        } else {
            Ok(TopicSelection::Explicit(set))
        }
    }

    pub fn single(index: TopicIndex) -> Self {
        TopicSelection::Explicit(BTreeSet::from([index]))
    }
}

/// Outcome of planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPlan {
    /// Everything is already complete
    Skip,
    /// Run these topics, in catalog order
    Run(Vec<TopicIndex>),
}

pub fn plan_run(completed: &BTreeSet<TopicIndex>, selection: &TopicSelection) -> RunPlan {
    let topics: Vec<TopicIndex> = match selection {
        TopicSelection::Default => TopicIndex::all().filter(|i| !completed.contains(i)).collect(),
        TopicSelection::Explicit(set) => set.iter().copied().collect(),
    };
    if topics.is_empty() {
        RunPlan::Skip
    } else {
        RunPlan::Run(topics)
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
