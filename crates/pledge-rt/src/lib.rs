// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pledge runtime: deferred values.
//!
//! A `DeferredValue` is the eventual outcome of an asynchronous computation.
//! `then` chains continuations onto it; resolving it with another deferred
//! value or a foreign thenable adopts that source's outcome. Continuations
//! always run from an explicit FIFO `TaskQueue`, never inline.
//!
//! Components:
//! - value: runtime values, error values, foreign objects
//! - queue: single-threaded FIFO task queue + driver
//! - deferred: state machine, `then`, settlement capabilities
//! - resolution: adoption of deferred values and thenables
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and `!Send`.

pub mod deferred;
mod latch;
pub mod queue;
mod resolution;
pub mod value;

pub use deferred::{handler, Deferred, DeferredValue, Handler, Outcome, Rejector, Resolver, Status};
pub use queue::{QueueConfig, QueueError, Task, TaskQueue, DEFAULT_ADOPTION_DEPTH};
pub use value::{ErrorKind, ErrorValue, ForeignObject, ForeignThenable, ThenFn, Value};
