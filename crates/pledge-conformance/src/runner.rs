// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run catalogue cases against an adapter.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::adapter::Adapter;
use crate::cases::{catalog, Case};

/// Result of running a single case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub id: &'static str,
    pub title: &'static str,
    pub passed: bool,
    /// Description of what happened
    pub message: String,
    /// Queue tasks executed while the case ran.
    pub tasks_run: u64,
}

/// Run one case on a fresh adapter.
///
/// A panicking check counts as a failure; the rest of the suite still runs.
pub fn run_case<A: Adapter>(case: &Case, adapter: A) -> CaseResult {
    let before = adapter.queue().executed();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (case.check)(&adapter)));
    let tasks_run = adapter.queue().executed() - before;

    let (passed, message) = match outcome {
        Ok(Ok(())) => (true, "ok".to_string()),
        Ok(Err(message)) => (false, message),
        Err(payload) => (false, format!("panicked: {}", panic_message(&*payload))),
    };

    let left = adapter.queue().len();
    if passed && left > 0 {
        warn!(case = case.id, left, "case finished with tasks still queued");
    }
    debug!(case = case.id, passed, tasks_run, "case finished");

    CaseResult {
        id: case.id,
        title: case.title,
        passed,
        message,
        tasks_run,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic>".to_string()
    }
}

/// Run every case matching `filter` (all of them for `None`), each on its
/// own adapter from `make_adapter`.
pub fn run_suite<A, F>(filter: Option<&str>, mut make_adapter: F) -> Vec<CaseResult>
where
    A: Adapter,
    F: FnMut() -> A,
{
    catalog()
        .iter()
        .filter(|case| filter.map_or(true, |f| case.matches(f)))
        .map(|case| run_case(case, make_adapter()))
        .collect()
}

/// Summary statistics for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub tasks_run: u64,
}

impl Summary {
    pub fn add(&mut self, result: &CaseResult) {
        self.total += 1;
        self.tasks_run += result.tasks_run;
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CaseResult>) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.add(result);
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::CoreAdapter;
    use pledge_rt::Value;

    fn failing(_: &dyn Adapter) -> Result<(), String> {
        Err("nope".to_string())
    }

    fn panicking(_: &dyn Adapter) -> Result<(), String> {
        panic!("boom")
    }

    fn busy(adapter: &dyn Adapter) -> Result<(), String> {
        adapter.resolved(Value::Null).then(None, None);
        adapter.queue().run_until_idle().map(|_| ()).map_err(|e| e.to_string())
    }

    #[test]
    fn failure_message_is_kept() {
        let case = Case { id: "x.1", title: "fails", check: failing };
        let result = run_case(&case, CoreAdapter::default());
        assert!(!result.passed);
        assert_eq!(result.message, "nope");
    }

    #[test]
    fn panic_is_a_failure() {
        let case = Case { id: "x.2", title: "panics", check: panicking };
        let result = run_case(&case, CoreAdapter::default());
        assert!(!result.passed);
        assert_eq!(result.message, "panicked: boom");
    }

    #[test]
    fn counts_tasks() {
        let case = Case { id: "x.3", title: "busy", check: busy };
        let result = run_case(&case, CoreAdapter::default());
        assert!(result.passed, "{}", result.message);
        assert_eq!(result.tasks_run, 1);
    }

    #[test]
    fn summary_counts() {
        let results = vec![
            run_case(&Case { id: "a", title: "", check: busy }, CoreAdapter::default()),
            run_case(&Case { id: "b", title: "", check: failing }, CoreAdapter::default()),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.tasks_run, 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn filter_selects_section() {
        let results = run_suite(Some("2.1"), CoreAdapter::default);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.id.starts_with("2.1.")));
    }

    #[test]
    fn unknown_filter_runs_nothing() {
        assert!(run_suite(Some("9.9"), CoreAdapter::default).is_empty());
    }
}
