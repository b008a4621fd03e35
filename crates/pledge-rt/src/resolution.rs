// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolution procedure.
//!
//! Runs whenever a pending deferred value is resolved with an arbitrary
//! value. The value is classified once, then:
//!
//! - the target itself: rejected with a `TypeError` (cycle)
//! - one of our deferred values: its outcome is adopted, now or on settle
//! - a foreign thenable: its `then` is called with a latched callback pair
//! - anything else: the target is fulfilled with it

use std::rc::Rc;

use tracing::debug;

use crate::deferred::{handler, DeferredValue, Outcome, Rejector, Resolver};
use crate::latch::OnceLatch;
use crate::value::{ErrorValue, ThenFn, Value};

/// What a resolution value turned out to be.
enum Adoptable {
    OwnDeferred(DeferredValue),
    ForeignThenable(ThenFn),
    Plain(Value),
}

impl Adoptable {
    /// Classify `x`. Reading a foreign object's `then` may fail; the failure
    /// comes back as the rejection reason.
    fn classify(x: Value) -> Result<Self, Value> {
        match x {
            Value::Deferred(d) => Ok(Adoptable::OwnDeferred(d)),
            Value::Object(object) => match object.then_capability()? {
                Some(then) => Ok(Adoptable::ForeignThenable(then)),
                None => Ok(Adoptable::Plain(Value::Object(object))),
            },
            other => Ok(Adoptable::Plain(other)),
        }
    }
}

pub(crate) fn cycle_error() -> Value {
    Value::Error(ErrorValue::type_error(
        "chaining cycle detected: a deferred value cannot be resolved with itself",
    ))
}

pub(crate) fn adoption_depth_error(limit: usize) -> Value {
    Value::Error(ErrorValue::type_error(format!(
        "thenable adoption too deep: more than {} nested `then` calls",
        limit
    )))
}

/// Resolve `target` with `x`.
pub(crate) fn resolve_value(target: &DeferredValue, x: Value) {
    let adoptable = match Adoptable::classify(x) {
        Ok(adoptable) => adoptable,
        Err(reason) => {
            debug!(%reason, "reading `then` failed");
            target.reject(reason);
            return;
        }
    };

    match adoptable {
        Adoptable::OwnDeferred(source) if source.ptr_eq(target) => {
            debug!("deferred value resolved with itself");
            target.reject(cycle_error());
        }
        Adoptable::OwnDeferred(source) => adopt_deferred(target, &source),
        Adoptable::ForeignThenable(then) => adopt_thenable(target, then),
        Adoptable::Plain(value) => target.fulfill(value),
    }
}

fn adopt_deferred(target: &DeferredValue, source: &DeferredValue) {
    match source.outcome() {
        Some(Outcome::Fulfilled(value)) => resolve_value(target, value),
        Some(Outcome::Rejected(reason)) => target.reject(reason),
        None => {
            let on_fulfilled = target.clone();
            let on_rejected = target.clone();
            source.then(
                Some(handler(move |value| {
                    resolve_value(&on_fulfilled, value);
                    Ok(Value::Undefined)
                })),
                Some(handler(move |reason| {
                    on_rejected.reject(reason);
                    Ok(Value::Undefined)
                })),
            );
        }
    }
}

fn adopt_thenable(target: &DeferredValue, then: ThenFn) {
    let Some(_level) = target.queue().enter_adoption() else {
        let limit = target.queue().config().adoption_depth;
        debug!(limit, "thenable adoption too deep");
        target.reject(adoption_depth_error(limit));
        return;
    };

    let latch = Rc::new(OnceLatch::new());
    let resolve = Resolver::latched(target.clone(), latch.clone());
    let reject = Rejector::latched(target.clone(), latch.clone());

    if let Err(reason) = then(resolve, reject) {
        if latch.trip() {
            target.reject(reason);
        } else {
            debug!(%reason, "thenable failed after settling; ignored");
        }
    }
}
