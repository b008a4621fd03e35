// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end behaviour of deferred values driven through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pledge_rt::{
    handler, DeferredValue, ErrorKind, ForeignThenable, QueueConfig, QueueError, Status,
    TaskQueue, Value,
};

fn double(v: Value) -> Result<Value, Value> {
    match v {
        Value::Int(n) => Ok(Value::Int(n * 2)),
        other => Err(Value::error(format!("not a number: {}", other))),
    }
}

#[test]
fn resolve_then_double() {
    let q = TaskQueue::new();
    let d = q.deferred();
    d.resolve.resolve(Value::Int(5));
    let next = d.promise.and_then(double);
    assert_eq!(next.status(), Status::Pending);
    q.run_until_idle().unwrap();
    assert_eq!(next.value(), Some(Value::Int(10)));
}

#[test]
fn rejection_passes_through_empty_then() {
    let q = TaskQueue::new();
    let d = q.deferred();
    d.reject.reject(Value::error("x"));
    let next = d.promise.then(None, None);
    q.run_until_idle().unwrap();
    assert_eq!(next.status(), Status::Rejected);
    assert_eq!(next.reason(), Some(Value::error("x")));
}

#[test]
fn outer_adopts_inner() {
    let q = TaskQueue::new();
    let inner = q.deferred();
    let outer = q.deferred();
    outer.resolve.resolve(inner.promise.clone().into());
    inner.resolve.resolve(Value::Int(7));
    q.run_until_idle().unwrap();
    assert_eq!(outer.promise.value(), Some(Value::Int(7)));
}

#[test]
fn resolving_with_self_is_a_cycle() {
    let q = TaskQueue::new();
    let p = q.deferred();
    p.resolve.resolve(p.promise.clone().into());
    q.run_until_idle().unwrap();
    let reason = p.promise.reason().expect("cycle rejects");
    assert_eq!(reason.as_error().map(|e| e.kind), Some(ErrorKind::TypeError));
}

#[test]
fn handler_returning_its_own_downstream_is_a_cycle() {
    let q = TaskQueue::new();
    let slot: Rc<RefCell<Option<DeferredValue>>> = Rc::new(RefCell::new(None));
    let reader = slot.clone();
    let next = q.resolved(Value::Null).and_then(move |_| {
        let me = reader.borrow().clone().expect("downstream stored");
        Ok(me.into())
    });
    *slot.borrow_mut() = Some(next.clone());
    q.run_until_idle().unwrap();
    let reason = next.reason().expect("cycle rejects");
    assert_eq!(reason.as_error().map(|e| e.kind), Some(ErrorKind::TypeError));
}

#[test]
fn handler_returning_pending_deferred_waits_for_it() {
    let q = TaskQueue::new();
    let later = q.deferred();
    let handoff = later.promise.clone();
    let next = q.resolved(Value::Null).and_then(move |_| Ok(handoff.into()));
    q.run_until_idle().unwrap();
    assert_eq!(next.status(), Status::Pending);
    later.resolve.resolve(Value::str("done"));
    q.run_until_idle().unwrap();
    assert_eq!(next.value(), Some(Value::str("done")));
}

#[test]
fn handler_returning_thenable_is_adopted() {
    let q = TaskQueue::new();
    let next = q.resolved(Value::Int(1)).and_then(|_| {
        Ok(ForeignThenable::new(|resolve, _| {
            resolve.resolve(Value::Int(42));
            Ok(())
        })
        .into_value())
    });
    q.run_until_idle().unwrap();
    assert_eq!(next.value(), Some(Value::Int(42)));
}

#[test]
fn registration_is_never_observed_running_synchronously() {
    let q = TaskQueue::new();
    let depth = Rc::new(Cell::new(0u32));
    let seen_inside = Rc::new(Cell::new(false));

    let d = q.resolved(Value::Null);
    depth.set(1);
    {
        let (depth, seen_inside) = (depth.clone(), seen_inside.clone());
        d.and_then(move |v| {
            if depth.get() == 1 {
                seen_inside.set(true);
            }
            Ok(v)
        });
    }
    depth.set(0);
    q.run_until_idle().unwrap();
    assert!(!seen_inside.get());
}

#[test]
fn fifo_across_settled_and_pending_registration() {
    let q = TaskQueue::new();
    let d = q.deferred();
    let order = Rc::new(RefCell::new(Vec::new()));
    for i in 0..3 {
        let order = order.clone();
        d.promise.and_then(move |v| {
            order.borrow_mut().push(i);
            Ok(v)
        });
    }
    d.resolve.resolve(Value::Null);
    for i in 3..6 {
        let order = order.clone();
        d.promise.and_then(move |v| {
            order.borrow_mut().push(i);
            Ok(v)
        });
    }
    q.run_until_idle().unwrap();
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn failure_travels_until_handled() {
    let q = TaskQueue::new();
    let end = q
        .resolved(Value::Int(1))
        .and_then(|_| Err(Value::error("broke")))
        .and_then(double)
        .and_then(double)
        .catch(|reason| Ok(Value::str(format!("handled {}", reason))));
    q.run_until_idle().unwrap();
    assert_eq!(end.value(), Some(Value::str("handled Error: broke")));
}

#[test]
fn then_with_both_handlers() {
    let q = TaskQueue::new();
    let next = q.rejected(Value::Int(3)).then(
        Some(handler(|_| Ok(Value::str("fulfilled")))),
        Some(handler(|reason| Ok(Value::str(format!("rejected {}", reason))))),
    );
    q.run_until_idle().unwrap();
    assert_eq!(next.value(), Some(Value::str("rejected 3")));
}

#[test]
fn self_rescheduling_thenable_hits_budget() {
    fn spin(q: &TaskQueue) -> Value {
        let q = q.clone();
        ForeignThenable::new(move |resolve, _| {
            let q = q.clone();
            let next = spin(&q);
            q.schedule(move || resolve.resolve(next));
            Ok(())
        })
        .into_value()
    }

    let q = TaskQueue::with_config(QueueConfig::with_budget(100));
    let d = q.deferred();
    d.resolve.resolve(spin(&q));
    let err = q.run_until_idle().unwrap_err();
    assert!(matches!(err, QueueError::BudgetExhausted { budget: 100, .. }));
    assert_eq!(d.promise.status(), Status::Pending);
}
