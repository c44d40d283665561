// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn company(name: &str) -> Company {
    Company::parse(name).unwrap()
}

#[test]
fn list_companies_on_missing_root_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("missing"));
    assert!(store.list_companies().unwrap().is_empty());
}

#[test]
fn list_companies_returns_sorted_directories_only() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    std::fs::create_dir(dir.path().join("zeta")).unwrap();
    std::fs::create_dir(dir.path().join("acme")).unwrap();
    std::fs::create_dir(dir.path().join(".cache")).unwrap();
    std::fs::write(dir.path().join("stray.txt"), "x").unwrap();

    let names: Vec<String> =
        store.list_companies().unwrap().into_iter().map(String::from).collect();
    assert_eq!(names, vec!["acme", "zeta"]);
}

#[test]
fn delete_removes_directory_and_reports_absence() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    let acme = company("acme");
    store.ensure_company_dir(&acme).unwrap();
    std::fs::write(store.company_file(&acme, "_1.txt"), "content").unwrap();

    assert!(store.exists(&acme));
    assert!(store.delete(&acme).unwrap());
    assert!(!store.exists(&acme));
    assert!(!store.delete(&acme).unwrap());
}

#[test]
fn company_file_is_prefixed_with_company_name() {
    let store = ArtifactStore::new("/outputs");
    let path = store.company_file(&company("acme"), "_proposal.txt");
    assert_eq!(path, PathBuf::from("/outputs/acme/acme_proposal.txt"));
}
