// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Deferred task queue.
//!
//! Single-threaded FIFO. `schedule` only enqueues; nothing runs until the
//! driver calls `run_next` or `run_until_idle`. Tasks scheduled while the
//! queue is draining land at the back and run in the same drain.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace, warn};

/// A unit of deferred work. Runs to completion before the next one starts.
pub type Task = Box<dyn FnOnce()>;

/// Default limit on nested synchronous thenable adoptions.
pub const DEFAULT_ADOPTION_DEPTH: usize = 256;

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Max tasks a single `run_until_idle` call may run. `None` = unbounded.
    pub task_budget: Option<usize>,
    /// Max thenable `then` calls nested inside one another on the stack.
    /// A thenable that resolves with itself recurses without ever touching
    /// the queue; past this depth the adopting value is rejected instead.
    pub adoption_depth: usize,
}

impl QueueConfig {
    pub fn with_budget(budget: usize) -> Self {
        Self {
            task_budget: Some(budget),
            ..Self::default()
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            task_budget: None,
            adoption_depth: DEFAULT_ADOPTION_DEPTH,
        }
    }
}

/// Errors from driving the queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("task budget of {budget} exhausted with {pending} task{} still queued", if *.pending == 1 { "" } else { "s" })]
    BudgetExhausted { budget: usize, pending: usize },
}

struct QueueInner {
    tasks: RefCell<VecDeque<Task>>,
    config: QueueConfig,
    /// Tasks run over the queue's lifetime.
    executed: Cell<u64>,
    /// Thenable `then` calls currently on the stack.
    adopting: Cell<usize>,
}

/// Handle to a FIFO task queue. Clones share the same queue.
#[derive(Clone)]
pub struct TaskQueue {
    inner: Rc<QueueInner>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            inner: Rc::new(QueueInner {
                tasks: RefCell::new(VecDeque::new()),
                config,
                executed: Cell::new(0),
                adopting: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> QueueConfig {
        self.inner.config
    }

    /// Append a task. Never runs it inline.
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + 'static,
    {
        let mut tasks = self.inner.tasks.borrow_mut();
        tasks.push_back(Box::new(task));
        trace!(queued = tasks.len(), "task scheduled");
    }

    /// Pop and run the front task. Returns false if the queue was empty.
    pub fn run_next(&self) -> bool {
        // The borrow must end before the task runs: tasks schedule tasks.
        let next = self.inner.tasks.borrow_mut().pop_front();
        match next {
            Some(task) => {
                task();
                self.inner.executed.set(self.inner.executed.get() + 1);
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty. Returns how many ran.
    ///
    /// With a `task_budget`, stops once the budget is spent and work is
    /// still queued. The remaining tasks stay queued.
    pub fn run_until_idle(&self) -> Result<usize, QueueError> {
        let mut ran = 0;
        loop {
            if let Some(budget) = self.inner.config.task_budget {
                if ran >= budget && !self.is_empty() {
                    let pending = self.len();
                    warn!(budget, pending, "task budget exhausted");
                    return Err(QueueError::BudgetExhausted { budget, pending });
                }
            }
            if !self.run_next() {
                break;
            }
            ran += 1;
        }
        debug!(ran, "task queue idle");
        Ok(ran)
    }

    pub fn len(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.tasks.borrow().is_empty()
    }

    /// Total tasks run since the queue was created.
    pub fn executed(&self) -> u64 {
        self.inner.executed.get()
    }

    /// Enter one level of synchronous thenable adoption. `None` once the
    /// configured depth is reached; the level is left when the guard drops.
    pub(crate) fn enter_adoption(&self) -> Option<AdoptionGuard> {
        let depth = self.inner.adopting.get();
        if depth >= self.inner.config.adoption_depth {
            return None;
        }
        self.inner.adopting.set(depth + 1);
        Some(AdoptionGuard {
            queue: self.clone(),
        })
    }

    /// True if both handles point at the same queue.
    pub fn same_queue(&self, other: &TaskQueue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// One level of thenable adoption. Drops back out even if `then` panics.
pub(crate) struct AdoptionGuard {
    queue: TaskQueue,
}

impl Drop for AdoptionGuard {
    fn drop(&mut self) {
        let adopting = &self.queue.inner.adopting;
        adopting.set(adopting.get() - 1);
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("queued", &self.len())
            .field("executed", &self.executed())
            .field("config", &self.inner.config)
            .finish()
    }
}
