// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-topic research artifact as seen by readers.

use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::job::{JobState, Progress};
use crate::topic::TopicIndex;

/// One topic's current and first-run content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicArtifact {
    pub index: TopicIndex,
    pub title: String,
    pub text: String,
    pub markdown: String,
    pub original_text: String,
    pub original_markdown: String,
    pub edited: bool,
    pub history_count: u32,
}

impl TopicArtifact {
    /// An artifact with no content yet
    pub fn empty(index: TopicIndex) -> Self {
        Self {
            index,
            title: index.title().to_string(),
            text: String::new(),
            markdown: String::new(),
            original_text: String::new(),
            original_markdown: String::new(),
            edited: false,
            history_count: 0,
        }
    }

    /// Complete iff either content form is non-empty
    pub fn is_complete(&self) -> bool {
        !self.text.is_empty() || !self.markdown.is_empty()
    }
}

/// Everything stored for one company, as returned to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResults {
    pub company: Company,
    pub state: JobState,
    pub progress: Progress,
    /// All catalog topics in order, including empty ones
    pub items: Vec<TopicArtifact>,
    pub has_proposal: bool,
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
