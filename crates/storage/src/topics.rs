// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topic content files and their edit metadata.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rd_core::{Company, TopicArtifact, TopicIndex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fs::{read_text, write_atomic};
use crate::store::{ArtifactStore, StoreError};

/// Content a topic held before one user edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub edited_at: DateTime<Utc>,
    pub text: String,
    pub markdown: String,
}

/// Sidecar metadata for a topic, created on the first write.
///
/// Reruns overwrite topic content but leave this file alone, so the first-run
/// content and the edit history survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TopicMeta {
    original_text: String,
    original_markdown: String,
    #[serde(default)]
    edited: bool,
    #[serde(default)]
    history: Vec<EditRecord>,
}

impl ArtifactStore {
    fn topic_path(&self, company: &Company, index: TopicIndex, ext: &str) -> PathBuf {
        self.company_file(company, &format!("_{}.{}", index, ext))
    }

    fn read_meta(&self, path: &Path) -> Result<Option<TopicMeta>, StoreError> {
        let raw = read_text(path)?;
        if raw.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable topic metadata");
                Ok(None)
            }
        }
    }

    fn write_meta(&self, path: &Path, meta: &TopicMeta) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(meta)
            .map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })?;
        write_atomic(path, &json)
    }

    /// Read one topic. Missing files read as an empty, incomplete artifact.
    pub fn read_topic(
        &self,
        company: &Company,
        index: TopicIndex,
    ) -> Result<TopicArtifact, StoreError> {
        let text = read_text(&self.topic_path(company, index, "txt"))?;
        let markdown = read_text(&self.topic_path(company, index, "md"))?;
        let meta = self.read_meta(&self.topic_path(company, index, "meta.json"))?;

        let mut artifact = TopicArtifact::empty(index);
        match meta {
            Some(meta) => {
                artifact.original_text = meta.original_text;
                artifact.original_markdown = meta.original_markdown;
                artifact.edited = meta.edited;
                artifact.history_count = meta.history.len() as u32;
            }
            // Written before metadata existed: current content is the original
            None => {
                artifact.original_text = text.clone();
                artifact.original_markdown = markdown.clone();
            }
        }
        artifact.text = text;
        artifact.markdown = markdown;
        Ok(artifact)
    }

    /// Read all topics in catalog order
    pub fn read_topics(&self, company: &Company) -> Result<Vec<TopicArtifact>, StoreError> {
        TopicIndex::all().map(|index| self.read_topic(company, index)).collect()
    }

    /// Indices of topics whose content is non-empty
    pub fn completed_topics(&self, company: &Company) -> Result<BTreeSet<TopicIndex>, StoreError> {
        let mut completed = BTreeSet::new();
        for artifact in self.read_topics(company)? {
            if artifact.is_complete() {
                completed.insert(artifact.index);
            }
        }
        Ok(completed)
    }

    /// Persist a runner result for one topic, overwriting current content.
    ///
    /// The first write for a topic also records it as the original content.
    pub fn write_topic(
        &self,
        company: &Company,
        index: TopicIndex,
        text: &str,
        markdown: &str,
    ) -> Result<(), StoreError> {
        self.ensure_company_dir(company)?;
        write_atomic(&self.topic_path(company, index, "txt"), text.as_bytes())?;
        write_atomic(&self.topic_path(company, index, "md"), markdown.as_bytes())?;

        let meta_path = self.topic_path(company, index, "meta.json");
        if self.read_meta(&meta_path)?.is_none() {
            let meta = TopicMeta {
                original_text: text.to_string(),
                original_markdown: markdown.to_string(),
                ..TopicMeta::default()
            };
            self.write_meta(&meta_path, &meta)?;
        }
        Ok(())
    }

    /// Replace a topic's content with user-edited text.
    ///
    /// The previous content is pushed onto the edit history and the topic is
    /// flagged as edited. Without an explicit markdown body the text is used
    /// for both forms. Blank text, or blank markdown when given, is refused
    /// so an edit can never empty a topic.
    pub fn edit_topic(
        &self,
        company: &Company,
        index: TopicIndex,
        text: &str,
        markdown: Option<&str>,
        edited_at_ms: u64,
    ) -> Result<TopicArtifact, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyEdit { index, field: "text" });
        }
        if markdown.is_some_and(|md| md.trim().is_empty()) {
            return Err(StoreError::EmptyEdit { index, field: "markdown" });
        }
        if !self.exists(company) {
            return Err(StoreError::CompanyMissing(company.clone()));
        }
        let current = self.read_topic(company, index)?;
        if !current.is_complete() {
            return Err(StoreError::TopicMissing { company: company.clone(), index });
        }

        let meta_path = self.topic_path(company, index, "meta.json");
        let mut meta = self.read_meta(&meta_path)?.unwrap_or_else(|| TopicMeta {
            original_text: current.original_text.clone(),
            original_markdown: current.original_markdown.clone(),
            ..TopicMeta::default()
        });
        meta.history.push(EditRecord {
            edited_at: DateTime::from_timestamp_millis(edited_at_ms as i64).unwrap_or_default(),
            text: current.text,
            markdown: current.markdown,
        });
        meta.edited = true;

        let markdown = markdown.unwrap_or(text);
        write_atomic(&self.topic_path(company, index, "txt"), text.as_bytes())?;
        write_atomic(&self.topic_path(company, index, "md"), markdown.as_bytes())?;
        self.write_meta(&meta_path, &meta)?;

        self.read_topic(company, index)
    }

    /// Edit history for one topic, oldest first
    pub fn topic_history(
        &self,
        company: &Company,
        index: TopicIndex,
    ) -> Result<Vec<EditRecord>, StoreError> {
        let meta = self.read_meta(&self.topic_path(company, index, "meta.json"))?;
        Ok(meta.map(|m| m.history).unwrap_or_default())
    }

    /// Trimmed, non-empty topic text in catalog order, as proposal input
    pub fn proposal_inputs(
        &self,
        company: &Company,
    ) -> Result<Vec<(TopicIndex, String)>, StoreError> {
        let mut inputs = Vec::new();
        for index in TopicIndex::all() {
            let text = read_text(&self.topic_path(company, index, "txt"))?;
            let text = text.trim();
            if !text.is_empty() {
                inputs.push((index, text.to_string()));
            }
        }
        Ok(inputs)
    }
}

#[cfg(test)]
#[path = "topics_tests.rs"]
mod tests;
