// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! List the case catalogue.

use pledge_conformance::catalog;

use crate::output;

pub fn cmd_list() {
    let mut section = "";
    for case in catalog() {
        if case.section() != section {
            section = case.section();
            println!("{}", output::section_header(&format!("Section {}", section)));
        }
        println!("  {} {}", output::case_id(case.id), case.title);
    }
}
