// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact store root: company directories, listing and deletion.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rd_core::{Company, TopicIndex};
use thiserror::Error;
use tracing::debug;

/// Errors from artifact store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no results for company '{0}'")]
    CompanyMissing(Company),

    #[error("topic {index} of '{company}' has no content")]
    TopicMissing { company: Company, index: TopicIndex },

    #[error("edit of topic {index} has no {field}")]
    EmptyEdit { index: TopicIndex, field: &'static str },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

/// Filesystem-backed store rooted at the outputs directory.
///
/// Holds no state beyond its root; every call reads or writes disk directly,
/// so separate processes (daemon and runner) can share one store.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn company_dir(&self, company: &Company) -> PathBuf {
        self.root.join(company.as_str())
    }

    /// Whether the company has an artifact directory
    pub fn exists(&self, company: &Company) -> bool {
        self.company_dir(company).is_dir()
    }

    pub(crate) fn ensure_company_dir(&self, company: &Company) -> Result<PathBuf, StoreError> {
        let dir = self.company_dir(company);
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(dir)
    }

    /// Path of a file inside the company directory named `<company><suffix>`
    pub(crate) fn company_file(&self, company: &Company, suffix: &str) -> PathBuf {
        self.company_dir(company).join(format!("{}{}", company.as_str(), suffix))
    }

    /// Company directories under the root, sorted by name.
    ///
    /// Entries whose names are not valid company names are skipped.
    pub fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.root, e)),
        };

        let mut companies = Vec::new();
        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            match Company::parse(name) {
                Ok(company) if company == name => companies.push(company),
                _ => debug!(name, "skipping non-company directory"),
            }
        }
        companies.sort();
        Ok(companies)
    }

    /// Remove the company's directory and everything in it.
    ///
    /// Returns `false` when there was nothing to delete.
    pub fn delete(&self, company: &Company) -> Result<bool, StoreError> {
        let dir = self.company_dir(company);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&dir, e)),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
