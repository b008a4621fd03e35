// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The case catalogue.
//!
//! Ids follow the clause numbering of the standard deferred-value
//! conformance suite: `2.1` states, `2.2` the `then` method, `2.3` the
//! resolution procedure. Every case talks to the runtime only through an
//! [`Adapter`] and the values it hands out.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pledge_rt::{
    handler, DeferredValue, ErrorKind, ForeignObject, ForeignThenable, Outcome, Rejector,
    Resolver, Status, ThenFn, Value,
};

use crate::adapter::Adapter;

/// Outcome of a single check: `Err` carries what went wrong.
pub type CheckResult = Result<(), String>;

/// One conformance case.
#[derive(Clone, Copy)]
pub struct Case {
    /// Clause id, e.g. `2.2.6.1`.
    pub id: &'static str,
    pub title: &'static str,
    pub check: fn(&dyn Adapter) -> CheckResult,
}

impl Case {
    /// Top-level section, e.g. `2.2` for `2.2.6.1`.
    pub fn section(&self) -> &'static str {
        section_of(self.id)
    }

    /// True if `filter` is this case's id or one of its ancestors.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.trim_end_matches('.');
        filter.is_empty()
            || self.id == filter
            || (self.id.starts_with(filter) && self.id[filter.len()..].starts_with('.'))
    }
}

/// The first two components of a case id.
pub fn section_of(id: &str) -> &str {
    match id.match_indices('.').nth(1) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

impl std::fmt::Debug for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Case")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish()
    }
}

// === Helpers ===

/// Ordered log of handler calls.
#[derive(Clone, Default)]
struct Calls(Rc<RefCell<Vec<String>>>);

impl Calls {
    fn record(&self, what: impl Into<String>) {
        self.0.borrow_mut().push(what.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    fn count(&self, what: &str) -> usize {
        self.0.borrow().iter().filter(|c| c.as_str() == what).count()
    }
}

fn dummy() -> Value {
    Value::str("dummy")
}

fn sentinel() -> Value {
    Value::str("sentinel")
}

fn drain(adapter: &dyn Adapter) -> CheckResult {
    adapter
        .queue()
        .run_until_idle()
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn ensure(cond: bool, message: impl Into<String>) -> CheckResult {
    if cond {
        Ok(())
    } else {
        Err(message.into())
    }
}

fn expect_fulfilled(d: &DeferredValue, expected: &Value) -> CheckResult {
    match d.outcome() {
        Some(Outcome::Fulfilled(v)) if v == *expected => Ok(()),
        other => Err(format!("expected fulfilled with {:?}, got {:?}", expected, other)),
    }
}

fn expect_rejected(d: &DeferredValue, expected: &Value) -> CheckResult {
    match d.outcome() {
        Some(Outcome::Rejected(r)) if r == *expected => Ok(()),
        other => Err(format!("expected rejected with {:?}, got {:?}", expected, other)),
    }
}

fn expect_pending(d: &DeferredValue) -> CheckResult {
    ensure(
        d.status() == Status::Pending,
        format!("expected pending, got {}", d.status()),
    )
}

/// Attach recording handlers to `d`; both pass their input through.
fn observe(d: &DeferredValue, calls: &Calls) -> DeferredValue {
    let (on_f, on_r) = (calls.clone(), calls.clone());
    d.then(
        Some(handler(move |v| {
            on_f.record("fulfilled");
            Ok(v)
        })),
        Some(handler(move |r| {
            on_r.record("rejected");
            Err(r)
        })),
    )
}

/// A value fulfilled with `x` through a handler's return value.
fn returned_from_handler(adapter: &dyn Adapter, x: Value) -> DeferredValue {
    adapter.resolved(dummy()).and_then(move |_| Ok(x))
}

// === 2.1 States ===

fn pending_may_settle(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    drain(adapter)?;
    expect_pending(&d.promise)?;
    d.resolve.resolve(sentinel());
    expect_fulfilled(&d.promise, &sentinel())
}

fn fulfilled_cannot_reject(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    d.resolve.resolve(dummy());
    d.reject.reject(dummy());
    drain(adapter)?;
    ensure(
        calls.entries() == ["fulfilled"],
        format!("handler calls: {:?}", calls.entries()),
    )
}

fn fulfilled_value_fixed(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    d.resolve.resolve(sentinel());
    d.resolve.resolve(dummy());
    let seen = d.promise.then(None, None);
    drain(adapter)?;
    expect_fulfilled(&seen, &sentinel())
}

fn rejected_cannot_fulfill(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    d.reject.reject(dummy());
    d.resolve.resolve(dummy());
    drain(adapter)?;
    ensure(
        calls.entries() == ["rejected"],
        format!("handler calls: {:?}", calls.entries()),
    )
}

fn rejected_reason_fixed(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    d.reject.reject(sentinel());
    d.reject.reject(dummy());
    let seen = d.promise.then(None, None);
    drain(adapter)?;
    expect_rejected(&seen, &sentinel())
}

// === 2.2 then ===

fn missing_on_fulfilled_ignored(adapter: &dyn Adapter) -> CheckResult {
    let calls = Calls::default();
    let c = calls.clone();
    adapter.rejected(dummy()).then(
        None,
        Some(handler(move |r| {
            c.record("rejected");
            Err(r)
        })),
    );
    drain(adapter)?;
    ensure(calls.count("rejected") == 1, "onRejected was not called")
}

fn missing_on_rejected_ignored(adapter: &dyn Adapter) -> CheckResult {
    let calls = Calls::default();
    let c = calls.clone();
    adapter.resolved(dummy()).then(
        Some(handler(move |v| {
            c.record("fulfilled");
            Ok(v)
        })),
        None,
    );
    drain(adapter)?;
    ensure(calls.count("fulfilled") == 1, "onFulfilled was not called")
}

fn on_fulfilled_receives_value(adapter: &dyn Adapter) -> CheckResult {
    let got: Rc<RefCell<Option<Value>>> = Rc::default();
    let slot = got.clone();
    adapter.resolved(sentinel()).and_then(move |v| {
        *slot.borrow_mut() = Some(v.clone());
        Ok(v)
    });
    drain(adapter)?;
    let got = got.borrow().clone();
    ensure(got == Some(sentinel()), format!("onFulfilled received {:?}", got))
}

fn on_fulfilled_not_before_fulfilled(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    drain(adapter)?;
    ensure(calls.entries().is_empty(), "onFulfilled ran before fulfillment")?;
    d.resolve.resolve(dummy());
    drain(adapter)?;
    ensure(calls.count("fulfilled") == 1, "onFulfilled did not run after fulfillment")
}

fn on_fulfilled_at_most_once(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    d.resolve.resolve(dummy());
    d.resolve.resolve(dummy());
    drain(adapter)?;
    d.resolve.resolve(dummy());
    d.reject.reject(dummy());
    drain(adapter)?;
    ensure(
        calls.count("fulfilled") == 1,
        format!("onFulfilled ran {} times", calls.count("fulfilled")),
    )
}

fn on_rejected_receives_reason(adapter: &dyn Adapter) -> CheckResult {
    let got: Rc<RefCell<Option<Value>>> = Rc::default();
    let slot = got.clone();
    adapter.rejected(sentinel()).catch(move |r| {
        *slot.borrow_mut() = Some(r.clone());
        Ok(r)
    });
    drain(adapter)?;
    let got = got.borrow().clone();
    ensure(got == Some(sentinel()), format!("onRejected received {:?}", got))
}

fn on_rejected_not_before_rejected(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    drain(adapter)?;
    ensure(calls.entries().is_empty(), "onRejected ran before rejection")?;
    d.reject.reject(dummy());
    drain(adapter)?;
    ensure(calls.count("rejected") == 1, "onRejected did not run after rejection")
}

fn on_rejected_at_most_once(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    d.reject.reject(dummy());
    d.reject.reject(dummy());
    drain(adapter)?;
    d.resolve.resolve(dummy());
    drain(adapter)?;
    ensure(
        calls.count("rejected") == 1,
        format!("onRejected ran {} times", calls.count("rejected")),
    )
}

fn async_on_already_fulfilled(adapter: &dyn Adapter) -> CheckResult {
    let calls = Calls::default();
    observe(&adapter.resolved(dummy()), &calls);
    ensure(calls.entries().is_empty(), "onFulfilled ran inside `then`")?;
    drain(adapter)?;
    ensure(calls.count("fulfilled") == 1, "onFulfilled never ran")
}

fn async_on_fulfill_call(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    d.resolve.resolve(dummy());
    ensure(calls.entries().is_empty(), "onFulfilled ran inside `resolve`")?;
    drain(adapter)?;
    ensure(calls.count("fulfilled") == 1, "onFulfilled never ran")
}

fn async_on_already_rejected(adapter: &dyn Adapter) -> CheckResult {
    let calls = Calls::default();
    observe(&adapter.rejected(dummy()), &calls);
    ensure(calls.entries().is_empty(), "onRejected ran inside `then`")?;
    drain(adapter)?;
    ensure(calls.count("rejected") == 1, "onRejected never ran")
}

fn async_on_reject_call(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let calls = Calls::default();
    observe(&d.promise, &calls);
    d.reject.reject(dummy());
    ensure(calls.entries().is_empty(), "onRejected ran inside `reject`")?;
    drain(adapter)?;
    ensure(calls.count("rejected") == 1, "onRejected never ran")
}

fn ordered_handlers(adapter: &dyn Adapter, d: &DeferredValue, settle: impl FnOnce()) -> CheckResult {
    let calls = Calls::default();
    for i in 0..3 {
        let (on_f, on_r) = (calls.clone(), calls.clone());
        d.then(
            Some(handler(move |v| {
                on_f.record(i.to_string());
                Ok(v)
            })),
            Some(handler(move |r| {
                on_r.record(i.to_string());
                Err(r)
            })),
        );
    }
    settle();
    drain(adapter)?;
    ensure(
        calls.entries() == ["0", "1", "2"],
        format!("handler order: {:?}", calls.entries()),
    )
}

fn multiple_on_fulfilled_in_order(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let resolve = d.resolve.clone();
    ordered_handlers(adapter, &d.promise, move || resolve.resolve(dummy()))
}

fn multiple_on_rejected_in_order(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let reject = d.reject.clone();
    ordered_handlers(adapter, &d.promise, move || reject.reject(dummy()))
}

fn handler_added_inside_handler_runs_last(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.resolved(dummy());
    let calls = Calls::default();
    {
        let (calls, inner, d2) = (calls.clone(), calls.clone(), d.clone());
        d.and_then(move |v| {
            calls.record("1");
            d2.and_then(move |v| {
                inner.record("3");
                Ok(v)
            });
            Ok(v)
        });
    }
    {
        let calls = calls.clone();
        d.and_then(move |v| {
            calls.record("2");
            Ok(v)
        });
    }
    drain(adapter)?;
    ensure(
        calls.entries() == ["1", "2", "3"],
        format!("handler order: {:?}", calls.entries()),
    )
}

fn then_returns_new_value(adapter: &dyn Adapter) -> CheckResult {
    let d = adapter.deferred();
    let next = d.promise.then(None, None);
    ensure(!next.ptr_eq(&d.promise), "`then` returned its receiver")?;
    expect_pending(&next)
}

fn fulfilled_handler_return_resolves(adapter: &dyn Adapter) -> CheckResult {
    let next = adapter.resolved(dummy()).and_then(|_| Ok(sentinel()));
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn rejected_handler_return_resolves(adapter: &dyn Adapter) -> CheckResult {
    let next = adapter.rejected(dummy()).catch(|_| Ok(sentinel()));
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn on_fulfilled_throw_rejects(adapter: &dyn Adapter) -> CheckResult {
    let next = adapter.resolved(dummy()).and_then(|_| Err(sentinel()));
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn on_rejected_throw_rejects(adapter: &dyn Adapter) -> CheckResult {
    let next = adapter.rejected(dummy()).catch(|_| Err(sentinel()));
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn missing_on_fulfilled_passes_value(adapter: &dyn Adapter) -> CheckResult {
    let next = adapter
        .resolved(sentinel())
        .catch(|_| Ok(Value::str("wrong branch")));
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn missing_on_rejected_passes_reason(adapter: &dyn Adapter) -> CheckResult {
    let next = adapter
        .rejected(sentinel())
        .and_then(|_| Ok(Value::str("wrong branch")));
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

// === 2.3 Resolution procedure ===

fn self_resolution_type_error(adapter: &dyn Adapter) -> CheckResult {
    let slot: Rc<RefCell<Option<DeferredValue>>> = Rc::default();
    let reader = slot.clone();
    let next = adapter.resolved(dummy()).and_then(move |_| {
        reader
            .borrow()
            .clone()
            .map(Value::Deferred)
            .ok_or_else(|| Value::error("downstream not stored"))
    });
    *slot.borrow_mut() = Some(next.clone());
    drain(adapter)?;
    match next.reason() {
        Some(Value::Error(e)) if e.kind == ErrorKind::TypeError => Ok(()),
        other => Err(format!("expected TypeError rejection, got {:?}", other)),
    }
}

fn adopt_pending_stays_pending(adapter: &dyn Adapter) -> CheckResult {
    let inner = adapter.deferred();
    let handoff = inner.promise.clone();
    let next = returned_from_handler(adapter, handoff.into());
    drain(adapter)?;
    expect_pending(&next)
}

fn adopt_eventually_fulfilled(adapter: &dyn Adapter) -> CheckResult {
    let inner = adapter.deferred();
    let next = returned_from_handler(adapter, inner.promise.clone().into());
    drain(adapter)?;
    inner.resolve.resolve(sentinel());
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn adopt_eventually_rejected(adapter: &dyn Adapter) -> CheckResult {
    let inner = adapter.deferred();
    let next = returned_from_handler(adapter, inner.promise.clone().into());
    drain(adapter)?;
    inner.reject.reject(sentinel());
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn adopt_already_fulfilled(adapter: &dyn Adapter) -> CheckResult {
    let next = returned_from_handler(adapter, adapter.resolved(sentinel()).into());
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn adopt_already_rejected(adapter: &dyn Adapter) -> CheckResult {
    let next = returned_from_handler(adapter, adapter.rejected(sentinel()).into());
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

/// Foreign object that counts how often its `then` is read.
struct CountingThenable {
    reads: Rc<Cell<usize>>,
    then: ThenFn,
}

impl ForeignObject for CountingThenable {
    fn then_capability(&self) -> Result<Option<ThenFn>, Value> {
        self.reads.set(self.reads.get() + 1);
        Ok(Some(self.then.clone()))
    }
}

fn then_read_once(adapter: &dyn Adapter) -> CheckResult {
    let reads = Rc::new(Cell::new(0));
    let then: ThenFn = Rc::new(|resolve: Resolver, _: Rejector| {
        resolve.resolve(sentinel());
        Ok(())
    });
    let object = Value::object(CountingThenable {
        reads: reads.clone(),
        then,
    });
    let next = returned_from_handler(adapter, object);
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())?;
    let n = reads.get();
    ensure(n == 1, format!("`then` read {} times", n))
}

struct ThrowingThenGetter;

impl ForeignObject for ThrowingThenGetter {
    fn then_capability(&self) -> Result<Option<ThenFn>, Value> {
        Err(sentinel())
    }
}

fn then_getter_throws(adapter: &dyn Adapter) -> CheckResult {
    let next = returned_from_handler(adapter, Value::object(ThrowingThenGetter));
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn thenable(then: impl Fn(Resolver, Rejector) -> Result<(), Value> + 'static) -> Value {
    ForeignThenable::new(then).into_value()
}

fn thenable_resolve_with_plain(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|resolve, _| {
        resolve.resolve(sentinel());
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn thenable_resolve_with_thenable(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|resolve, _| {
        resolve.resolve(thenable(|resolve, _| {
            resolve.resolve(sentinel());
            Ok(())
        }));
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn thenable_resolve_with_deferred(adapter: &dyn Adapter) -> CheckResult {
    let inner = adapter.deferred();
    let handoff = inner.promise.clone();
    let x = thenable(move |resolve, _| {
        resolve.resolve(handoff.clone().into());
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    inner.resolve.resolve(sentinel());
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn thenable_resolve_async(adapter: &dyn Adapter) -> CheckResult {
    let queue = adapter.queue().clone();
    let x = thenable(move |resolve, _| {
        queue.schedule(move || resolve.resolve(sentinel()));
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn thenable_reject(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|_, reject| {
        reject.reject(sentinel());
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn thenable_reject_with_thenable_not_adopted(adapter: &dyn Adapter) -> CheckResult {
    let reason = thenable(|resolve, _| {
        resolve.resolve(dummy());
        Ok(())
    });
    let expected = reason.clone();
    let x = thenable(move |_, reject| {
        reject.reject(reason.clone());
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_rejected(&next, &expected)
}

fn thenable_first_call_wins(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|resolve, reject| {
        resolve.resolve(sentinel());
        reject.reject(dummy());
        resolve.resolve(dummy());
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn thenable_first_call_wins_async(adapter: &dyn Adapter) -> CheckResult {
    let queue = adapter.queue().clone();
    let x = thenable(move |resolve, reject| {
        reject.reject(sentinel());
        queue.schedule(move || resolve.resolve(dummy()));
        Ok(())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn thenable_throw_after_resolve_ignored(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|resolve, _| {
        resolve.resolve(sentinel());
        Err(dummy())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_fulfilled(&next, &sentinel())
}

fn thenable_throw_after_reject_ignored(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|_, reject| {
        reject.reject(sentinel());
        Err(dummy())
    });
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

fn thenable_throw_rejects(adapter: &dyn Adapter) -> CheckResult {
    let x = thenable(|_, _| Err(sentinel()));
    let next = returned_from_handler(adapter, x);
    drain(adapter)?;
    expect_rejected(&next, &sentinel())
}

struct NoThen;

impl ForeignObject for NoThen {
    fn then_capability(&self) -> Result<Option<ThenFn>, Value> {
        Ok(None)
    }
}

fn non_callable_then_fulfills(adapter: &dyn Adapter) -> CheckResult {
    let object = Value::object(NoThen);
    let next = returned_from_handler(adapter, object.clone());
    drain(adapter)?;
    expect_fulfilled(&next, &object)
}

fn plain_values_fulfill(adapter: &dyn Adapter) -> CheckResult {
    let plain = [
        Value::Undefined,
        Value::Null,
        Value::Bool(false),
        Value::Int(0),
        Value::Float(-1.5),
        Value::str(""),
        Value::error("not thrown, just returned"),
    ];
    let chained: Vec<(Value, DeferredValue)> = plain
        .iter()
        .map(|x| (x.clone(), returned_from_handler(adapter, x.clone())))
        .collect();
    drain(adapter)?;
    for (x, next) in &chained {
        expect_fulfilled(next, x)?;
    }
    Ok(())
}

/// Every case, in clause order.
pub fn catalog() -> Vec<Case> {
    vec![
        Case { id: "2.1.1", title: "a pending value may settle", check: pending_may_settle },
        Case { id: "2.1.2.1", title: "a fulfilled value cannot become rejected", check: fulfilled_cannot_reject },
        Case { id: "2.1.2.2", title: "a fulfilled value cannot change", check: fulfilled_value_fixed },
        Case { id: "2.1.3.1", title: "a rejected value cannot become fulfilled", check: rejected_cannot_fulfill },
        Case { id: "2.1.3.2", title: "a rejection reason cannot change", check: rejected_reason_fixed },
        Case { id: "2.2.1.1", title: "a missing onFulfilled is ignored", check: missing_on_fulfilled_ignored },
        Case { id: "2.2.1.2", title: "a missing onRejected is ignored", check: missing_on_rejected_ignored },
        Case { id: "2.2.2.1", title: "onFulfilled receives the value", check: on_fulfilled_receives_value },
        Case { id: "2.2.2.2", title: "onFulfilled does not run before fulfillment", check: on_fulfilled_not_before_fulfilled },
        Case { id: "2.2.2.3", title: "onFulfilled runs at most once", check: on_fulfilled_at_most_once },
        Case { id: "2.2.3.1", title: "onRejected receives the reason", check: on_rejected_receives_reason },
        Case { id: "2.2.3.2", title: "onRejected does not run before rejection", check: on_rejected_not_before_rejected },
        Case { id: "2.2.3.3", title: "onRejected runs at most once", check: on_rejected_at_most_once },
        Case { id: "2.2.4.1", title: "then on a fulfilled value does not run inline", check: async_on_already_fulfilled },
        Case { id: "2.2.4.2", title: "fulfilling does not run handlers inline", check: async_on_fulfill_call },
        Case { id: "2.2.4.3", title: "then on a rejected value does not run inline", check: async_on_already_rejected },
        Case { id: "2.2.4.4", title: "rejecting does not run handlers inline", check: async_on_reject_call },
        Case { id: "2.2.6.1", title: "onFulfilled handlers run in registration order", check: multiple_on_fulfilled_in_order },
        Case { id: "2.2.6.2", title: "onRejected handlers run in registration order", check: multiple_on_rejected_in_order },
        Case { id: "2.2.6.3", title: "a handler added inside a handler runs after the rest", check: handler_added_inside_handler_runs_last },
        Case { id: "2.2.7", title: "then returns a new value", check: then_returns_new_value },
        Case { id: "2.2.7.1.1", title: "onFulfilled's return value resolves the result", check: fulfilled_handler_return_resolves },
        Case { id: "2.2.7.1.2", title: "onRejected's return value resolves the result", check: rejected_handler_return_resolves },
        Case { id: "2.2.7.2.1", title: "onFulfilled throwing rejects the result", check: on_fulfilled_throw_rejects },
        Case { id: "2.2.7.2.2", title: "onRejected throwing rejects the result", check: on_rejected_throw_rejects },
        Case { id: "2.2.7.3", title: "without onFulfilled the value passes through", check: missing_on_fulfilled_passes_value },
        Case { id: "2.2.7.4", title: "without onRejected the reason passes through", check: missing_on_rejected_passes_reason },
        Case { id: "2.3.1", title: "resolving with itself rejects with a TypeError", check: self_resolution_type_error },
        Case { id: "2.3.2.1", title: "adopting a pending value stays pending", check: adopt_pending_stays_pending },
        Case { id: "2.3.2.2", title: "adopting a value that later fulfills", check: adopt_eventually_fulfilled },
        Case { id: "2.3.2.3", title: "adopting a value that later rejects", check: adopt_eventually_rejected },
        Case { id: "2.3.2.4", title: "adopting an already fulfilled value", check: adopt_already_fulfilled },
        Case { id: "2.3.2.5", title: "adopting an already rejected value", check: adopt_already_rejected },
        Case { id: "2.3.3.1", title: "then is read exactly once", check: then_read_once },
        Case { id: "2.3.3.2", title: "reading then throws", check: then_getter_throws },
        Case { id: "2.3.3.3.1.1", title: "thenable resolves with a plain value", check: thenable_resolve_with_plain },
        Case { id: "2.3.3.3.1.2", title: "thenable resolves with another thenable", check: thenable_resolve_with_thenable },
        Case { id: "2.3.3.3.1.3", title: "thenable resolves with a deferred value", check: thenable_resolve_with_deferred },
        Case { id: "2.3.3.3.1.4", title: "thenable resolves asynchronously", check: thenable_resolve_async },
        Case { id: "2.3.3.3.2.1", title: "thenable rejects", check: thenable_reject },
        Case { id: "2.3.3.3.2.2", title: "a thenable rejection reason is not adopted", check: thenable_reject_with_thenable_not_adopted },
        Case { id: "2.3.3.3.3.1", title: "the first callback call wins", check: thenable_first_call_wins },
        Case { id: "2.3.3.3.3.2", title: "the first callback call wins across turns", check: thenable_first_call_wins_async },
        Case { id: "2.3.3.3.4.1.1", title: "then throwing after resolve is ignored", check: thenable_throw_after_resolve_ignored },
        Case { id: "2.3.3.3.4.1.2", title: "then throwing after reject is ignored", check: thenable_throw_after_reject_ignored },
        Case { id: "2.3.3.3.4.2", title: "then throwing before any callback rejects", check: thenable_throw_rejects },
        Case { id: "2.3.3.4", title: "an object without a callable then fulfills", check: non_callable_then_fulfills },
        Case { id: "2.3.4", title: "plain values fulfill", check: plain_values_fulfill },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn case(id: &'static str) -> Case {
        Case { id, title: "", check: |_| Ok(()) }
    }

    #[test]
    fn sections() {
        assert_eq!(case("2.2.6.1").section(), "2.2");
        assert_eq!(case("2.3.1").section(), "2.3");
        assert_eq!(case("2.1").section(), "2.1");
    }

    #[test]
    fn matching() {
        let c = case("2.2.6.1");
        assert!(c.matches(""));
        assert!(c.matches("2"));
        assert!(c.matches("2.2"));
        assert!(c.matches("2.2.6."));
        assert!(c.matches("2.2.6.1"));
        assert!(!c.matches("2.2.6.10"));
        assert!(!c.matches("2.2.7"));
        assert!(!case("2.2.60").matches("2.2.6"));
    }

    #[test]
    fn ids_are_unique() {
        let all = catalog();
        let ids: HashSet<_> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn every_section_is_covered() {
        let sections: HashSet<_> = catalog().iter().map(|c| c.section()).collect();
        for s in ["2.1", "2.2", "2.3"] {
            assert!(sections.contains(s), "no cases for {}", s);
        }
    }
}
