// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conformance run command.

use colored::Colorize;
use std::process;

use pledge_conformance::{run_suite, section_of, CaseResult, CoreAdapter, Summary};
use tracing::info;

use crate::config::RunConfig;
use crate::output;
use crate::report::Report;

pub fn cmd_conformance(config: &RunConfig) {
    let filter = config.filter.as_deref();
    let queue_config = config.queue_config();
    info!(?filter, budget = ?config.task_budget, "running conformance suite");

    let results = run_suite(filter, || CoreAdapter::new(queue_config));
    let summary = Summary::from_results(&results);

    if results.is_empty() {
        eprintln!(
            "{}: no cases match '{}'",
            output::error_label(),
            filter.unwrap_or_default()
        );
        eprintln!("{}: run `pledge list` to see case ids", output::hint_label());
        process::exit(1);
    }

    if config.json {
        let report = Report::new(filter, config.task_budget, &results, &summary);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}: serializing report: {}", output::error_label(), e);
                process::exit(1);
            }
        }
    } else {
        print_human(&results, &summary);
    }

    if !summary.all_passed() {
        process::exit(1);
    }
}

fn print_human(results: &[CaseResult], summary: &Summary) {
    let mut section = "";
    for result in results {
        let this_section = section_of(result.id);
        if this_section != section {
            if !section.is_empty() {
                println!();
            }
            section = this_section;
            println!("{}", output::section_header(&format!("Section {}", section)));
        }
        let status = if result.passed {
            output::status_pass()
        } else {
            output::status_fail()
        };
        println!(
            "  {} {} {} {}",
            status,
            output::case_id(result.id),
            result.title,
            output::tasks(result.tasks_run)
        );
    }

    println!("{}", output::separator(50));
    println!(
        "{} cases, {}, {}, {} tasks run",
        summary.total,
        output::passed_count(summary.passed),
        output::failed_count(summary.failed),
        summary.tasks_run
    );

    if summary.failed > 0 {
        println!("\n{}", "Failed cases:".red().bold());
        for result in results.iter().filter(|r| !r.passed) {
            println!(
                "  {} {} - {}",
                output::status_fail(),
                result.id,
                result.message
            );
        }
    }
}
