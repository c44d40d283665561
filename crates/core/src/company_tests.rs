// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "acme", "acme" },
    trimmed = { "  acme corp \n", "acme corp" },
    japanese = { "トヨタ自動車", "トヨタ自動車" },
    inner_dot = { "acme.inc", "acme.inc" },
)]
fn parse_accepts(raw: &str, expected: &str) {
    let company = Company::parse(raw).unwrap();
    assert_eq!(company, expected);
}

#[parameterized(
    slash = { "acme/../etc" },
    backslash = { "acme\\corp" },
    dot = { "." },
    dotdot = { ".." },
    hidden = { ".running" },
    control = { "acme\u{7}" },
)]
fn parse_rejects_unsafe_names(raw: &str) {
    assert!(matches!(Company::parse(raw), Err(CompanyError::Invalid { .. })), "{raw:?}");
}

#[test]
fn parse_rejects_blank() {
    assert_eq!(Company::parse("   "), Err(CompanyError::Empty));
}

#[test]
fn serde_round_trips_through_validation() {
    let company: Company = serde_json::from_str("\" acme \"").unwrap();
    assert_eq!(company.as_str(), "acme");
    assert_eq!(serde_json::to_string(&company).unwrap(), "\"acme\"");
    assert!(serde_json::from_str::<Company>("\"a/b\"").is_err());
}
