// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The adapter surface the suite drives.
//!
//! Three factories (`resolved`, `rejected`, `deferred`) plus the queue the
//! produced values schedule onto, so the runner can drain it.

use pledge_rt::{Deferred, DeferredValue, QueueConfig, TaskQueue, Value};

pub trait Adapter {
    /// An already-fulfilled value.
    fn resolved(&self, value: Value) -> DeferredValue;
    /// An already-rejected value.
    fn rejected(&self, reason: Value) -> DeferredValue;
    /// A pending value plus its raw resolve/reject capabilities.
    fn deferred(&self) -> Deferred;
    fn queue(&self) -> &TaskQueue;
}

/// Adapter over the runtime, built only from the public constructor.
#[derive(Debug, Clone)]
pub struct CoreAdapter {
    queue: TaskQueue,
}

impl CoreAdapter {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            queue: TaskQueue::with_config(config),
        }
    }
}

impl Default for CoreAdapter {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl Adapter for CoreAdapter {
    fn resolved(&self, value: Value) -> DeferredValue {
        DeferredValue::new(&self.queue, |resolve, _| resolve.resolve(value))
    }

    fn rejected(&self, reason: Value) -> DeferredValue {
        DeferredValue::new(&self.queue, |_, reject| reject.reject(reason))
    }

    fn deferred(&self) -> Deferred {
        let (promise, (resolve, reject)) =
            DeferredValue::new_with(&self.queue, |resolve, reject| (resolve, reject));
        Deferred {
            promise,
            resolve,
            reject,
        }
    }

    fn queue(&self) -> &TaskQueue {
        &self.queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pledge_rt::Status;

    #[test]
    fn resolved_is_fulfilled() {
        let a = CoreAdapter::default();
        assert_eq!(a.resolved(Value::Int(1)).value(), Some(Value::Int(1)));
    }

    #[test]
    fn rejected_is_rejected() {
        let a = CoreAdapter::default();
        assert_eq!(a.rejected(Value::error("r")).reason(), Some(Value::error("r")));
    }

    #[test]
    fn deferred_capabilities_drive_promise() {
        let a = CoreAdapter::default();
        let d = a.deferred();
        assert_eq!(d.promise.status(), Status::Pending);
        d.resolve.resolve(Value::Int(2));
        assert_eq!(d.promise.value(), Some(Value::Int(2)));
        assert!(d.resolve.target().ptr_eq(&d.promise));
    }

    #[test]
    fn values_share_the_adapter_queue() {
        let a = CoreAdapter::default();
        let d = a.resolved(Value::Null);
        assert!(d.queue().same_queue(a.queue()));
    }
}
