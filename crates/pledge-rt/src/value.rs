// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.
//!
//! Fulfillment values and rejection reasons are both `Value`s. Failures are
//! values too: a rejected deferred value simply carries one as its reason.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::deferred::{DeferredValue, Rejector, Resolver};

/// Kind of an error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Plain error raised by user code.
    Error,
    /// Type mismatch, e.g. a deferred value resolved with itself.
    TypeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "Error"),
            ErrorKind::TypeError => write!(f, "TypeError"),
        }
    }
}

/// An error carried as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ErrorValue {
    pub kind: ErrorKind,
    pub message: Rc<str>,
}

impl ErrorValue {
    pub fn new(message: impl Into<Rc<str>>) -> Self {
        Self {
            kind: ErrorKind::Error,
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<Rc<str>>) -> Self {
        Self {
            kind: ErrorKind::TypeError,
            message: message.into(),
        }
    }
}

/// A foreign object's `then` capability.
///
/// Invoked with a one-shot resolve/reject pair. `Err` is a synchronous
/// failure thrown out of the call.
pub type ThenFn = Rc<dyn Fn(Resolver, Rejector) -> Result<(), Value>>;

/// An object from outside this crate that may expose a `then` capability.
pub trait ForeignObject {
    /// Read the object's `then` member.
    ///
    /// `Err` means the read itself failed. `Ok(None)` means there is no
    /// callable `then`, so the object resolves as a plain value.
    fn then_capability(&self) -> Result<Option<ThenFn>, Value>;

    fn describe(&self) -> String {
        "[object]".to_string()
    }
}

/// Foreign object whose `then` is a closure.
pub struct ForeignThenable {
    then: ThenFn,
}

impl ForeignThenable {
    pub fn new<F>(then: F) -> Self
    where
        F: Fn(Resolver, Rejector) -> Result<(), Value> + 'static,
    {
        Self {
            then: Rc::new(then),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(Rc::new(self))
    }
}

impl ForeignObject for ForeignThenable {
    fn then_capability(&self) -> Result<Option<ThenFn>, Value> {
        Ok(Some(self.then.clone()))
    }

    fn describe(&self) -> String {
        "[thenable]".to_string()
    }
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Error(ErrorValue),
    /// One of our own deferred values.
    Deferred(DeferredValue),
    /// Anything else; adopted if it exposes a `then` capability.
    Object(Rc<dyn ForeignObject>),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn error(message: impl Into<Rc<str>>) -> Self {
        Value::Error(ErrorValue::new(message))
    }

    pub fn object<T: ForeignObject + 'static>(object: T) -> Self {
        Value::Object(Rc::new(object))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Error(_) => "error",
            Value::Deferred(_) => "deferred",
            Value::Object(_) => "object",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_deferred(&self) -> Option<&DeferredValue> {
        match self {
            Value::Deferred(d) => Some(d),
            _ => None,
        }
    }
}

// Deferred values and foreign objects compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Deferred(a), Value::Deferred(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Error(e) => write!(f, "Error({})", e),
            Value::Deferred(d) => write!(f, "{:?}", d),
            Value::Object(o) => write!(f, "Object({})", o.describe()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Error(e) => write!(f, "{}", e),
            Value::Deferred(d) => write!(f, "[deferred {}]", d.status()),
            Value::Object(o) => write!(f, "{}", o.describe()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<ErrorValue> for Value {
    fn from(e: ErrorValue) -> Self {
        Value::Error(e)
    }
}

impl From<DeferredValue> for Value {
    fn from(d: DeferredValue) -> Self {
        Value::Deferred(d)
    }
}
