// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Machine-readable run report for `--json`.

use serde::Serialize;

use pledge_conformance::{CaseResult, Summary};

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_budget: Option<usize>,
    pub summary: SummaryJson,
    pub cases: Vec<CaseJson<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SummaryJson {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub tasks_run: u64,
}

#[derive(Debug, Serialize)]
pub struct CaseJson<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub passed: bool,
    pub message: &'a str,
    pub tasks_run: u64,
}

impl<'a> Report<'a> {
    pub fn new(
        filter: Option<&'a str>,
        task_budget: Option<usize>,
        results: &'a [CaseResult],
        summary: &Summary,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            filter,
            task_budget,
            summary: SummaryJson {
                total: summary.total,
                passed: summary.passed,
                failed: summary.failed,
                tasks_run: summary.tasks_run,
            },
            cases: results
                .iter()
                .map(|r| CaseJson {
                    id: r.id,
                    title: r.title,
                    passed: r.passed,
                    message: &r.message,
                    tasks_run: r.tasks_run,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_summary_and_cases() {
        let results = vec![CaseResult {
            id: "2.3.1",
            title: "cycle",
            passed: false,
            message: "expected TypeError".to_string(),
            tasks_run: 2,
        }];
        let summary = Summary::from_results(&results);
        let report = Report::new(Some("2.3"), None, &results, &summary);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();

        assert_eq!(json["filter"], "2.3");
        assert!(json.get("task_budget").is_none());
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["summary"]["tasks_run"], 2);
        assert_eq!(json["cases"][0]["id"], "2.3.1");
        assert_eq!(json["cases"][0]["passed"], false);
    }
}
