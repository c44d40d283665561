// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fixed research topic catalog.
//!
//! Every company is researched against the same ordered list of questions.
//! Topics are addressed by a 1-based index that also appears in artifact
//! file names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Research questions, in run order
pub const TOPICS: [&str; 5] = [
    "事業の全体像",
    "外部環境と市場評価",
    "競争優位と差別化要因",
    "直近のニュース取得",
    "世間の評価",
];

/// Number of topics in the catalog
pub const TOPIC_COUNT: usize = TOPICS.len();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopicError {
    #[error("topic index {0} out of range (expected 1..={TOPIC_COUNT})")]
    OutOfRange(u32),

    #[error("topic index '{0}' is not a number")]
    NotANumber(String),
}

/// 1-based position in [`TOPICS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TopicIndex(u8);

impl TopicIndex {
    pub fn new(index: u32) -> Result<Self, TopicError> {
        if (1..=TOPIC_COUNT as u32).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(TopicError::OutOfRange(index))
        }
    }

    /// All topic indices in run order
    pub fn all() -> impl Iterator<Item = TopicIndex> {
        (1..=TOPIC_COUNT as u8).map(TopicIndex)
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// The question sent to the research workflow for this topic
    pub fn title(self) -> &'static str {
        TOPICS[usize::from(self.0) - 1]
    }
}

impl std::fmt::Display for TopicIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for TopicIndex {
    type Error = TopicError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicIndex> for u32 {
    fn from(index: TopicIndex) -> Self {
        index.get()
    }
}

impl std::str::FromStr for TopicIndex {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let n = s.parse::<u32>().map_err(|_| TopicError::NotANumber(s.to_string()))?;
        Self::new(n)
    }
}

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;
