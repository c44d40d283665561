// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Proposal artifact and its progress file.

use std::path::PathBuf;

use rd_core::{Company, ProposalProgress};
use tracing::warn;

use crate::fs::{read_text, remove_if_exists, write_atomic};
use crate::store::{ArtifactStore, StoreError};

impl ArtifactStore {
    fn proposal_path(&self, company: &Company, ext: &str) -> PathBuf {
        self.company_file(company, &format!("_proposal.{}", ext))
    }

    fn progress_path(&self, company: &Company) -> PathBuf {
        self.company_file(company, "_proposal_progress.json")
    }

    /// The cached proposal, if one with non-blank content exists
    pub fn read_proposal(&self, company: &Company) -> Result<Option<String>, StoreError> {
        let text = read_text(&self.proposal_path(company, "txt"))?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }

    pub fn has_proposal(&self, company: &Company) -> Result<bool, StoreError> {
        Ok(self.read_proposal(company)?.is_some())
    }

    /// Persist the proposal as both text and markdown
    pub fn write_proposal(&self, company: &Company, text: &str) -> Result<(), StoreError> {
        self.ensure_company_dir(company)?;
        write_atomic(&self.proposal_path(company, "txt"), text.as_bytes())?;
        write_atomic(&self.proposal_path(company, "md"), text.as_bytes())
    }

    /// Stored progress, or `None` when absent or unreadable
    pub fn read_proposal_progress(
        &self,
        company: &Company,
    ) -> Result<Option<ProposalProgress>, StoreError> {
        let path = self.progress_path(company);
        let raw = read_text(&path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(progress) => Ok(Some(progress)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable proposal progress");
                Ok(None)
            }
        }
    }

    pub fn write_proposal_progress(
        &self,
        company: &Company,
        progress: &ProposalProgress,
    ) -> Result<(), StoreError> {
        self.ensure_company_dir(company)?;
        let path = self.progress_path(company);
        let json = serde_json::to_vec(progress)
            .map_err(|e| StoreError::Json { path: path.clone(), source: e })?;
        write_atomic(&path, &json)
    }

    pub fn clear_proposal_progress(&self, company: &Company) -> Result<(), StoreError> {
        remove_if_exists(&self.progress_path(company))
    }
}

#[cfg(test)]
#[path = "proposal_tests.rs"]
mod tests;
