// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::config::BUDGET_ENV;
use crate::output;

pub fn print_usage() {
    println!(
        "{} {} - Deferred values and their conformance suite",
        output::title("Pledge"),
        output::version(env!("CARGO_PKG_VERSION"))
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("pledge"),
        output::arg("<command>"),
        output::arg("[options]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {}  Run the conformance suite", output::command("conformance"));
    println!("  {}         List case ids and titles", output::command("list"));
    println!("  {}         Show this help", output::command("help"));
    println!("  {}      Show version", output::command("version"));

    println!();
    println!("{}", output::section_header("Conformance options:"));
    println!("  {} {}  Run one case or a section, e.g. 2.3", output::arg("--filter"), output::arg("<id>"));
    println!("  {} {}     Max tasks per queue drain", output::arg("--budget"), output::arg("<n>"));
    println!("  {}             Output results as structured JSON", output::arg("--json"));

    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}  Default for --budget", output::arg(BUDGET_ENV));
    println!("  {}            Tracing filter, e.g. pledge_rt=trace", output::arg("RUST_LOG"));
    println!("  {}            Disable colors", output::arg("NO_COLOR"));
    println!("  {}         Force colors when piped", output::arg("FORCE_COLOR"));
}
