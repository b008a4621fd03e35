// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conformance suite for deferred values.
//!
//! The suite never touches runtime internals. It drives an implementation
//! through an [`Adapter`] exposing three factories:
//!
//! - `resolved(value)` - an already-fulfilled value
//! - `rejected(reason)` - an already-rejected value
//! - `deferred()` - a pending value plus its resolve/reject capabilities
//!
//! and the task queue those values schedule onto, which each case drains
//! explicitly. Cases are numbered by clause (`2.1` states, `2.2` the `then`
//! method, `2.3` the resolution procedure) and can be filtered by prefix.

pub mod adapter;
pub mod cases;
pub mod runner;

pub use adapter::{Adapter, CoreAdapter};
pub use cases::{catalog, section_of, Case, CheckResult};
pub use runner::{run_case, run_suite, CaseResult, Summary};
