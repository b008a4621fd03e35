// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The whole catalogue against the runtime's own adapter.

use pledge_conformance::{catalog, run_suite, CoreAdapter, Summary};
use pledge_rt::QueueConfig;

#[test]
fn core_adapter_passes_everything() {
    let results = run_suite(None, CoreAdapter::default);
    let failures: Vec<String> = results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| format!("{} {}: {}", r.id, r.title, r.message))
        .collect();
    assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
    assert_eq!(results.len(), catalog().len());
}

#[test]
fn sections_partition_the_catalogue() {
    let total: usize = ["2.1", "2.2", "2.3"]
        .into_iter()
        .map(|s| run_suite(Some(s), CoreAdapter::default).len())
        .sum();
    assert_eq!(total, catalog().len());
}

#[test]
fn single_case_by_id() {
    let results = run_suite(Some("2.3.1"), CoreAdapter::default);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "2.3.1");
    assert!(results[0].passed, "{}", results[0].message);
}

#[test]
fn suite_fits_a_modest_budget() {
    let results = run_suite(None, || CoreAdapter::new(QueueConfig::with_budget(64)));
    let summary = Summary::from_results(&results);
    assert!(summary.all_passed(), "{:?}", summary);
    assert!(summary.tasks_run > 0);
}
