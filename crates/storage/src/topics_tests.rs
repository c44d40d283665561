// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn setup() -> (TempDir, ArtifactStore, Company) {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    (dir, store, Company::parse("acme").unwrap())
}

fn topic(n: u32) -> TopicIndex {
    TopicIndex::new(n).unwrap()
}

#[test]
fn missing_topic_reads_as_empty() {
    let (_dir, store, acme) = setup();
    let artifact = store.read_topic(&acme, topic(1)).unwrap();
    assert!(!artifact.is_complete());
    assert_eq!(artifact.title, "事業の全体像");
    assert_eq!(artifact.history_count, 0);
}

#[test]
fn write_topic_records_original_on_first_write_only() {
    let (_dir, store, acme) = setup();
    store.write_topic(&acme, topic(2), "first", "# first").unwrap();
    store.write_topic(&acme, topic(2), "second", "# second").unwrap();

    let artifact = store.read_topic(&acme, topic(2)).unwrap();
    assert_eq!(artifact.text, "second");
    assert_eq!(artifact.markdown, "# second");
    assert_eq!(artifact.original_text, "first");
    assert_eq!(artifact.original_markdown, "# first");
    assert!(!artifact.edited);
}

#[test]
fn files_follow_company_index_naming() {
    let (dir, store, acme) = setup();
    store.write_topic(&acme, topic(3), "body", "body").unwrap();
    assert!(dir.path().join("acme/acme_3.txt").is_file());
    assert!(dir.path().join("acme/acme_3.md").is_file());
    assert!(dir.path().join("acme/acme_3.meta.json").is_file());
}

#[test]
fn completed_topics_counts_non_empty_content() {
    let (dir, store, acme) = setup();
    store.write_topic(&acme, topic(1), "one", "one").unwrap();
    store.write_topic(&acme, topic(3), "three", "three").unwrap();
    // markdown alone is enough
    std::fs::write(dir.path().join("acme/acme_5.md"), "five").unwrap();
    // empty files are not
    std::fs::write(dir.path().join("acme/acme_4.txt"), "").unwrap();

    let completed: Vec<u32> =
        store.completed_topics(&acme).unwrap().into_iter().map(TopicIndex::get).collect();
    assert_eq!(completed, vec![1, 3, 5]);
}

#[test]
fn edit_pushes_history_and_flags_topic() {
    let (_dir, store, acme) = setup();
    store.write_topic(&acme, topic(1), "draft", "# draft").unwrap();

    let edited = store.edit_topic(&acme, topic(1), "fixed", None, 1_700_000_000_000).unwrap();
    assert_eq!(edited.text, "fixed");
    assert_eq!(edited.markdown, "fixed");
    assert!(edited.edited);
    assert_eq!(edited.history_count, 1);
    assert_eq!(edited.original_text, "draft");

    let history = store.topic_history(&acme, topic(1)).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "draft");
    assert_eq!(history[0].markdown, "# draft");
    assert_eq!(history[0].edited_at.timestamp_millis(), 1_700_000_000_000);
}

#[test]
fn edit_with_markdown_keeps_forms_separate() {
    let (_dir, store, acme) = setup();
    store.write_topic(&acme, topic(1), "draft", "draft").unwrap();
    let edited = store.edit_topic(&acme, topic(1), "plain", Some("**rich**"), 0).unwrap();
    assert_eq!(edited.text, "plain");
    assert_eq!(edited.markdown, "**rich**");
}

#[test]
fn rerun_after_edit_keeps_history_and_original() {
    let (_dir, store, acme) = setup();
    store.write_topic(&acme, topic(4), "v1", "v1").unwrap();
    store.edit_topic(&acme, topic(4), "v1-edited", None, 0).unwrap();
    store.write_topic(&acme, topic(4), "v2", "v2").unwrap();

    let artifact = store.read_topic(&acme, topic(4)).unwrap();
    assert_eq!(artifact.text, "v2");
    assert_eq!(artifact.original_text, "v1");
    assert!(artifact.edited);
    assert_eq!(artifact.history_count, 1);
}

#[test]
fn edit_rejects_missing_company_and_empty_topic() {
    let (_dir, store, acme) = setup();
    assert!(matches!(
        store.edit_topic(&acme, topic(1), "x", None, 0),
        Err(StoreError::CompanyMissing(_))
    ));

    store.write_topic(&acme, topic(1), "one", "one").unwrap();
    assert!(matches!(
        store.edit_topic(&acme, topic(2), "x", None, 0),
        Err(StoreError::TopicMissing { .. })
    ));
}

#[test]
fn blank_edit_is_refused_before_history_changes() {
    let (_dir, store, acme) = setup();
    store.write_topic(&acme, topic(3), "research", "# research").unwrap();

    for (text, markdown) in [("", None), ("  \n\t", None), ("fine", Some(" \n"))] {
        assert!(matches!(
            store.edit_topic(&acme, topic(3), text, markdown, 0),
            Err(StoreError::EmptyEdit { .. })
        ));
    }

    let artifact = store.read_topic(&acme, topic(3)).unwrap();
    assert_eq!(artifact.text, "research");
    assert!(artifact.is_complete());
    assert!(!artifact.edited);
    assert!(store.topic_history(&acme, topic(3)).unwrap().is_empty());
}

#[test]
fn legacy_topic_without_metadata_uses_current_as_original() {
    let (dir, store, acme) = setup();
    std::fs::create_dir_all(dir.path().join("acme")).unwrap();
    std::fs::write(dir.path().join("acme/acme_2.txt"), "legacy").unwrap();

    let artifact = store.read_topic(&acme, topic(2)).unwrap();
    assert_eq!(artifact.original_text, "legacy");
    assert!(!artifact.edited);
}

#[test]
fn proposal_inputs_skip_blank_topics_and_trim() {
    let (dir, store, acme) = setup();
    store.write_topic(&acme, topic(1), "  one \n", "one").unwrap();
    store.write_topic(&acme, topic(2), "   ", "   ").unwrap();
    std::fs::write(dir.path().join("acme/acme_4.md"), "markdown only").unwrap();
    store.write_topic(&acme, topic(5), "five", "five").unwrap();

    let inputs = store.proposal_inputs(&acme).unwrap();
    let indices: Vec<u32> = inputs.iter().map(|(i, _)| i.get()).collect();
    assert_eq!(indices, vec![1, 5]);
    assert_eq!(inputs[0].1, "one");
}
