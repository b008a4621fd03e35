// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Deferred value state machine.
//!
//! A deferred value starts pending and settles at most once, to either a
//! fulfillment value or a rejection reason. Continuations registered with
//! `then` are never run inline: settlement (or registration on an already
//! settled value) only schedules them on the value's task queue.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use tracing::trace;

use crate::latch::OnceLatch;
use crate::queue::TaskQueue;
use crate::resolution;
use crate::value::Value;

/// A `then` handler. `Ok` resolves the downstream value, `Err` rejects it.
pub type Handler = Box<dyn FnOnce(Value) -> Result<Value, Value>>;

/// Box a closure as a `Handler`.
pub fn handler<F>(f: F) -> Handler
where
    F: FnOnce(Value) -> Result<Value, Value> + 'static,
{
    Box::new(f)
}

fn identity() -> Handler {
    handler(Ok)
}

fn rethrow() -> Handler {
    handler(Err)
}

/// Settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Fulfilled,
    Rejected,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Fulfilled => write!(f, "fulfilled"),
            Status::Rejected => write!(f, "rejected"),
        }
    }
}

/// Settled payload. Value and reason can never coexist.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Fulfilled(Value),
    Rejected(Value),
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Fulfilled(_) => Status::Fulfilled,
            Outcome::Rejected(_) => Status::Rejected,
        }
    }
}

/// Continuations only exist while pending; settling consumes them.
enum State {
    Pending(Vec<Continuation>),
    Settled(Outcome),
}

/// A registered handler pair and the downstream value it settles.
struct Continuation {
    on_fulfilled: Handler,
    on_rejected: Handler,
    downstream: DeferredValue,
}

impl Continuation {
    fn run(self, outcome: Outcome) {
        let result = match outcome {
            Outcome::Fulfilled(value) => (self.on_fulfilled)(value),
            Outcome::Rejected(reason) => (self.on_rejected)(reason),
        };
        match result {
            Ok(x) => self.downstream.resolve(x),
            Err(reason) => self.downstream.reject(reason),
        }
    }
}

/// The eventual outcome of an asynchronous computation.
///
/// Cheap to clone: clones share state, and the value lives as long as its
/// longest holder (creator, subscribers, queued continuations).
#[derive(Clone)]
pub struct DeferredValue {
    state: Rc<RefCell<State>>,
    queue: TaskQueue,
}

impl DeferredValue {
    /// Create a deferred value and run `executor` with its settlement
    /// capabilities, synchronously.
    ///
    /// The executor has no failure channel and nothing is caught: a panic
    /// inside it unwinds through this constructor instead of rejecting the
    /// new value. Report failures through the `Rejector`.
    pub fn new<F>(queue: &TaskQueue, executor: F) -> Self
    where
        F: FnOnce(Resolver, Rejector),
    {
        Self::new_with(queue, executor).0
    }

    /// Like `new`, but hands back whatever the executor returns.
    pub fn new_with<F, R>(queue: &TaskQueue, executor: F) -> (Self, R)
    where
        F: FnOnce(Resolver, Rejector) -> R,
    {
        let deferred = Self::pending(queue);
        let out = executor(Resolver::new(deferred.clone()), Rejector::new(deferred.clone()));
        (deferred, out)
    }

    /// A pending value with nothing attached.
    pub fn pending(queue: &TaskQueue) -> Self {
        Self {
            state: Rc::new(RefCell::new(State::Pending(Vec::new()))),
            queue: queue.clone(),
        }
    }

    pub fn status(&self) -> Status {
        match &*self.state.borrow() {
            State::Pending(_) => Status::Pending,
            State::Settled(outcome) => outcome.status(),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status() != Status::Pending
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match &*self.state.borrow() {
            State::Pending(_) => None,
            State::Settled(outcome) => Some(outcome.clone()),
        }
    }

    /// Fulfillment value, if fulfilled.
    pub fn value(&self) -> Option<Value> {
        match self.outcome() {
            Some(Outcome::Fulfilled(value)) => Some(value),
            _ => None,
        }
    }

    /// Rejection reason, if rejected.
    pub fn reason(&self) -> Option<Value> {
        match self.outcome() {
            Some(Outcome::Rejected(reason)) => Some(reason),
            _ => None,
        }
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn ptr_eq(&self, other: &DeferredValue) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Resolve with `x`, adopting it if it is a deferred value or thenable.
    /// No-op once settled.
    pub fn resolve(&self, x: Value) {
        if self.is_settled() {
            trace!("resolve ignored: already settled");
            return;
        }
        resolution::resolve_value(self, x);
    }

    /// Reject with `reason`. No-op once settled; the first settlement wins.
    pub fn reject(&self, reason: Value) {
        self.settle(Outcome::Rejected(reason));
    }

    pub(crate) fn fulfill(&self, value: Value) {
        self.settle(Outcome::Fulfilled(value));
    }

    fn settle(&self, outcome: Outcome) {
        let continuations = {
            let mut state = self.state.borrow_mut();
            match mem::replace(&mut *state, State::Settled(outcome.clone())) {
                State::Pending(continuations) => continuations,
                settled @ State::Settled(_) => {
                    *state = settled;
                    trace!("settlement ignored: already settled");
                    return;
                }
            }
        };
        trace!(
            status = %outcome.status(),
            continuations = continuations.len(),
            "deferred value settled"
        );
        for continuation in continuations {
            let outcome = outcome.clone();
            self.queue.schedule(move || continuation.run(outcome));
        }
    }

    /// Register continuations and return the value they settle.
    ///
    /// Missing handlers default to passing the value through and re-raising
    /// the reason. Handlers always run from the task queue, even when this
    /// value is already settled.
    pub fn then(&self, on_fulfilled: Option<Handler>, on_rejected: Option<Handler>) -> DeferredValue {
        let downstream = DeferredValue::pending(&self.queue);
        let continuation = Continuation {
            on_fulfilled: on_fulfilled.unwrap_or_else(identity),
            on_rejected: on_rejected.unwrap_or_else(rethrow),
            downstream: downstream.clone(),
        };

        let outcome = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                State::Pending(continuations) => {
                    continuations.push(continuation);
                    return downstream;
                }
                State::Settled(outcome) => outcome.clone(),
            }
        };
        self.queue.schedule(move || continuation.run(outcome));
        downstream
    }

    /// `then` with only a fulfillment handler.
    pub fn and_then<F>(&self, on_fulfilled: F) -> DeferredValue
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        self.then(Some(handler(on_fulfilled)), None)
    }

    /// `then` with only a rejection handler.
    pub fn catch<F>(&self, on_rejected: F) -> DeferredValue
    where
        F: FnOnce(Value) -> Result<Value, Value> + 'static,
    {
        self.then(None, Some(handler(on_rejected)))
    }
}

impl fmt::Debug for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("DeferredValue");
        match self.state.try_borrow() {
            Ok(state) => match &*state {
                State::Pending(continuations) => s
                    .field("status", &Status::Pending)
                    .field("continuations", &continuations.len()),
                State::Settled(Outcome::Fulfilled(value)) => {
                    s.field("status", &Status::Fulfilled).field("value", value)
                }
                State::Settled(Outcome::Rejected(reason)) => {
                    s.field("status", &Status::Rejected).field("reason", reason)
                }
            },
            Err(_) => s.field("status", &"<borrowed>"),
        };
        s.finish()
    }
}

/// Resolve capability bound to one deferred value.
///
/// Handed to executors and to foreign `then` capabilities. The latched
/// variant shares a one-shot latch with its `Rejector` sibling.
#[derive(Clone)]
pub struct Resolver {
    target: DeferredValue,
    latch: Option<Rc<OnceLatch>>,
}

impl Resolver {
    pub(crate) fn new(target: DeferredValue) -> Self {
        Self { target, latch: None }
    }

    pub(crate) fn latched(target: DeferredValue, latch: Rc<OnceLatch>) -> Self {
        Self {
            target,
            latch: Some(latch),
        }
    }

    pub fn resolve(&self, value: Value) {
        if let Some(latch) = &self.latch {
            if !latch.trip() {
                trace!("thenable resolve ignored: callback pair already used");
                return;
            }
        }
        self.target.resolve(value);
    }

    pub fn target(&self) -> &DeferredValue {
        &self.target
    }
}

/// Reject capability bound to one deferred value.
#[derive(Clone)]
pub struct Rejector {
    target: DeferredValue,
    latch: Option<Rc<OnceLatch>>,
}

impl Rejector {
    pub(crate) fn new(target: DeferredValue) -> Self {
        Self { target, latch: None }
    }

    pub(crate) fn latched(target: DeferredValue, latch: Rc<OnceLatch>) -> Self {
        Self {
            target,
            latch: Some(latch),
        }
    }

    pub fn reject(&self, reason: Value) {
        if let Some(latch) = &self.latch {
            if !latch.trip() {
                trace!("thenable reject ignored: callback pair already used");
                return;
            }
        }
        self.target.reject(reason);
    }

    pub fn target(&self) -> &DeferredValue {
        &self.target
    }
}

/// A deferred value together with its raw settlement capabilities.
#[derive(Clone)]
pub struct Deferred {
    pub promise: DeferredValue,
    pub resolve: Resolver,
    pub reject: Rejector,
}

impl TaskQueue {
    /// A pending value plus its resolve/reject capabilities.
    pub fn deferred(&self) -> Deferred {
        let promise = DeferredValue::pending(self);
        Deferred {
            resolve: Resolver::new(promise.clone()),
            reject: Rejector::new(promise.clone()),
            promise,
        }
    }

    /// A value resolved with `value` (adopting it if it is adoptable).
    pub fn resolved(&self, value: Value) -> DeferredValue {
        DeferredValue::new(self, |resolve, _| resolve.resolve(value))
    }

    /// A value rejected with `reason`.
    pub fn rejected(&self, reason: Value) -> DeferredValue {
        DeferredValue::new(self, |_, reject| reject.reject(reason))
    }
}
