// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Company identity.
//!
//! A company is nothing more than its name; the name doubles as the artifact
//! directory name, so it is normalized and checked for filesystem safety on
//! the way in.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from company name validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompanyError {
    #[error("company name is empty")]
    Empty,

    #[error("invalid company name {name:?}: {reason}")]
    Invalid { name: String, reason: &'static str },
}

/// Validated, trimmed company name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Company(String);

impl Company {
    /// Normalize and validate a raw company name.
    pub fn parse(raw: &str) -> Result<Self, CompanyError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(CompanyError::Empty);
        }
        let invalid = |reason| CompanyError::Invalid { name: name.to_string(), reason };
        if name.starts_with('.') {
            return Err(invalid("must not start with '.'"));
        }
        if name.contains(['/', '\\']) {
            return Err(invalid("must not contain path separators"));
        }
        if name.chars().any(char::is_control) {
            return Err(invalid("must not contain control characters"));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Company {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Company {
    type Err = CompanyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Company {
    type Error = CompanyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Company> for String {
    fn from(company: Company) -> Self {
        company.0
    }
}

impl PartialEq<str> for Company {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Company {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "company_tests.rs"]
mod tests;
