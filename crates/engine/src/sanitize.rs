// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! URL stripping for proposal input.
//!
//! Research answers cite sources as bare URLs and markdown links. Those are
//! removed before transformation; link text survives, link targets do not.

use regex::Regex;
use std::sync::LazyLock;

// Applied in order: wrapped links first, then bare forms
#[allow(clippy::expect_used)]
static URL_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\(\[www\.[^\]]+\]\(https?://[^)]+\)\)", ""),
        (r"\[([^\]]+)\]\(https?://[^)]+\)", "$1"),
        (r"\(https?://[^)]+\)", ""),
        (r"\(www\.[^)]+\)", ""),
        (r"\[https?://[^\]]+\]", ""),
        (r"\[www\.[^\]]+\]", ""),
        (r"https?://[^\s)\](]+(?:#:~:text=[^\s)\](]+)?", ""),
        (r"\bwww\.[^\s)\](]+", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("constant regex pattern is valid"), replacement)
    })
    .collect()
});

// Whitespace left behind by removals
#[allow(clippy::expect_used)]
static SPACING_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [(r"\s+", " "), (r"\s+\.", "."), (r"\s+,", ","), (r"\s+\)", ")"), (r"\(\s+", "(")]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("constant regex pattern is valid"), replacement)
        })
        .collect()
});

/// Remove URL-shaped substrings and normalize the leftover spacing.
///
/// Whitespace runs, including newlines, collapse to a single space.
pub fn strip_urls(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in URL_PATTERNS.iter().chain(SPACING_PATTERNS.iter()) {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out.trim().to_string()
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
