// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn set(indices: &[u32]) -> BTreeSet<TopicIndex> {
    indices.iter().map(|&i| TopicIndex::new(i).unwrap()).collect()
}

fn topics(plan: RunPlan) -> Vec<u32> {
    match plan {
        RunPlan::Run(topics) => topics.into_iter().map(TopicIndex::get).collect(),
        RunPlan::Skip => Vec::new(),
    }
}

#[parameterized(
    omitted = { None },
    empty = { Some(vec![]) },
    full = { Some(vec![1, 2, 3, 4, 5]) },
    full_unordered_with_dupes = { Some(vec![5, 4, 3, 2, 1, 1]) },
)]
fn default_selections(raw: Option<Vec<u32>>) {
    assert_eq!(TopicSelection::from_request(raw.as_deref()).unwrap(), TopicSelection::Default);
}

#[parameterized(
    zero = { 0 },
    six = { 6 },
)]
fn out_of_range_topic_is_rejected(bad: u32) {
    let err = TopicSelection::from_request(Some(&[1, bad])).unwrap_err();
    assert_eq!(err, PlanError::InvalidTopic(TopicError::OutOfRange(bad)));
}

#[test]
fn default_resumes_only_incomplete_topics() {
    let plan = plan_run(&set(&[1, 3]), &TopicSelection::Default);
    assert_eq!(topics(plan), vec![2, 4, 5]);
}

#[test]
fn default_on_complete_company_skips() {
    assert_eq!(plan_run(&set(&[1, 2, 3, 4, 5]), &TopicSelection::Default), RunPlan::Skip);
}

#[test]
fn explicit_subset_overwrites_completed_topics() {
    let selection = TopicSelection::from_request(Some(&[2])).unwrap();
    let plan = plan_run(&set(&[1, 2, 3, 4, 5]), &selection);
    assert_eq!(topics(plan), vec![2]);
}

#[test]
fn explicit_subset_runs_in_catalog_order() {
    let selection = TopicSelection::from_request(Some(&[4, 1, 4])).unwrap();
    assert_eq!(topics(plan_run(&BTreeSet::new(), &selection)), vec![1, 4]);
}

fn index_set() -> impl Strategy<Value = BTreeSet<TopicIndex>> {
    proptest::collection::btree_set(1u32..=5, 0..=5)
        .prop_map(|s| s.into_iter().map(|i| TopicIndex::new(i).unwrap()).collect())
}

proptest! {
    #[test]
    fn default_plan_partitions_the_catalog(completed in index_set()) {
        let planned: BTreeSet<TopicIndex> = match plan_run(&completed, &TopicSelection::Default) {
            RunPlan::Run(topics) => topics.into_iter().collect(),
            RunPlan::Skip => BTreeSet::new(),
        };
        prop_assert!(planned.is_disjoint(&completed));
        prop_assert_eq!(planned.len() + completed.len(), TOPIC_COUNT);
    }

    #[test]
    fn explicit_plan_ignores_completion(completed in index_set(), requested in index_set()) {
        prop_assume!(!requested.is_empty() && requested.len() < TOPIC_COUNT);
        let selection = TopicSelection::Explicit(requested.clone());
        let planned: BTreeSet<TopicIndex> = match plan_run(&completed, &selection) {
            RunPlan::Run(topics) => topics.into_iter().collect(),
            RunPlan::Skip => BTreeSet::new(),
        };
        prop_assert_eq!(planned, requested);
    }
}
