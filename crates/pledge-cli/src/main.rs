// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pledge CLI - runs the deferred-value conformance suite.

mod commands;
mod config;
mod help;
mod logging;
mod output;
mod report;

use std::env;
use std::process;

use config::RunConfig;

fn main() {
    output::init();
    logging::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        help::print_usage();
        return;
    }

    match args[1].as_str() {
        "conformance" => {
            let config = match RunConfig::parse(&args[2..], |key| env::var(key).ok()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{}: {}", output::error_label(), e);
                    eprintln!("{}: run `pledge help` for options", output::hint_label());
                    process::exit(2);
                }
            };
            commands::conformance::cmd_conformance(&config);
        }
        "list" => commands::list::cmd_list(),
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => {
            println!("pledge {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            eprintln!("{}: unknown command: {}", output::error_label(), other);
            help::print_usage();
            process::exit(2);
        }
    }
}
