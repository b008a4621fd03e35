// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Diagnostic tracing for the runtime and the suite.
//!
//! Tracing is for debugging only: it goes to stderr and never mixes with
//! the report on stdout, so `--json` output stays parseable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// ```bash
/// RUST_LOG=pledge_rt=trace pledge conformance --filter 2.3.1
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
