// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    // colored handles NO_COLOR itself; FORCE_COLOR needs an explicit override
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

// === Error Output ===

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn hint_label() -> ColoredString {
    "hint".cyan()
}

// === Status Output ===

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

pub fn case_id(id: &str) -> ColoredString {
    format!("{:<14}", id).dimmed()
}

pub fn tasks(n: u64) -> ColoredString {
    format!("({} task{})", n, if n == 1 { "" } else { "s" }).dimmed()
}

// === Help Output ===

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn version(v: &str) -> ColoredString {
    v.dimmed()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}

// === Decorations ===

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}

// === Test Summary ===

pub fn passed_count(n: usize) -> ColoredString {
    format!("{} passed", n).green()
}

pub fn failed_count(n: usize) -> ColoredString {
    if n > 0 {
        format!("{} failed", n).red()
    } else {
        format!("{} failed", n).normal()
    }
}
