//! Attribute payloads, deferred values and sort ranks.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
pub use serde_json::Value;

use crate::label::Label;

/// Attribute map owned by every node and every edge.
pub type Attrs = BTreeMap<String, Value>;

type DeferredFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A computation evaluated when an attribute set is applied.
#[derive(Clone)]
pub struct Deferred {
    func: Arc<DeferredFn>,
    args: Vec<Value>,
}

impl Deferred {
    /// Wraps a function and the arguments it will be called with.
    pub fn new<F>(func: F, args: Vec<Value>) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            args,
        }
    }

    /// Invokes the wrapped function with its stored arguments.
    pub fn evaluate(&self) -> Value {
        (self.func)(&self.args)
    }

    /// Arguments forwarded on evaluation.
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Attribute value as supplied by callers: either literal or generated on use.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Applied verbatim.
    Literal(Value),
    /// Evaluated once per application, then applied to every target.
    Deferred(Deferred),
}

impl AttrValue {
    /// Produces the concrete value, evaluating deferred computations.
    pub fn resolve(&self) -> Value {
        match self {
            AttrValue::Literal(value) => value.clone(),
            AttrValue::Deferred(deferred) => deferred.evaluate(),
        }
    }

    /// Convenience constructor for a deferred value.
    pub fn deferred<F>(func: F, args: Vec<Value>) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        AttrValue::Deferred(Deferred::new(func, args))
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(Value, bool, i64, i32, u64, usize, f64, &str, String);

impl From<Deferred> for AttrValue {
    fn from(deferred: Deferred) -> Self {
        AttrValue::Deferred(deferred)
    }
}

/// Named values applied to a set of nodes or edges.
pub type AttrSet = BTreeMap<String, AttrValue>;

/// Totally ordered sort value produced by node and edge criteria.
///
/// Numbers compare numerically across `Int` and `Float`; variants otherwise
/// order as `Missing < numbers < Text < Seq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rank {
    /// No value could be produced.
    Missing,
    /// Integer rank.
    Int(i64),
    /// Floating point rank.
    Float(f64),
    /// Textual rank.
    Text(String),
    /// Composite rank compared lexicographically.
    Seq(Vec<Rank>),
}

impl Rank {
    /// Converts an attribute value into a rank.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null | Value::Object(_) => Rank::Missing,
            Value::Bool(flag) => Rank::Int(i64::from(*flag)),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Rank::Int(int),
                None => number.as_f64().map(Rank::Float).unwrap_or(Rank::Missing),
            },
            Value::String(text) => Rank::Text(text.clone()),
            Value::Array(items) => Rank::Seq(items.iter().map(Rank::from_value).collect()),
        }
    }

    /// Returns the numeric payload as `f64`, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Rank::Int(value) => Some(*value as f64),
            Rank::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Last structural element: the final item of a sequence, the rank itself otherwise.
    pub fn last_element(&self) -> Rank {
        match self {
            Rank::Seq(items) => items.last().cloned().unwrap_or(Rank::Missing),
            other => other.clone(),
        }
    }

    fn variant_order(&self) -> u8 {
        match self {
            Rank::Missing => 0,
            Rank::Int(_) | Rank::Float(_) => 1,
            Rank::Text(_) => 2,
            Rank::Seq(_) => 3,
        }
    }
}

impl From<&Label> for Rank {
    fn from(label: &Label) -> Self {
        match label {
            Label::Int(value) => Rank::Int(*value),
            Label::Str(value) => Rank::Text(value.clone()),
        }
    }
}

impl From<Rank> for Value {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Missing => Value::Null,
            Rank::Int(value) => Value::from(value),
            Rank::Float(value) => Value::from(value),
            Rank::Text(value) => Value::from(value),
            Rank::Seq(items) => Value::Array(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<i64> for Rank {
    fn from(value: i64) -> Self {
        Rank::Int(value)
    }
}

impl From<usize> for Rank {
    fn from(value: usize) -> Self {
        Rank::Int(value as i64)
    }
}

impl From<f64> for Rank {
    fn from(value: f64) -> Self {
        Rank::Float(value)
    }
}

impl From<&str> for Rank {
    fn from(value: &str) -> Self {
        Rank::Text(value.to_string())
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Rank::Int(a), Rank::Int(b)) => a.cmp(b),
            (Rank::Text(a), Rank::Text(b)) => a.cmp(b),
            (Rank::Seq(a), Rank::Seq(b)) => a.cmp(b),
            (Rank::Missing, Rank::Missing) => Ordering::Equal,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.variant_order().cmp(&b.variant_order()),
            },
        }
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Rank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rank {}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Missing => write!(f, "-"),
            Rank::Int(value) => write!(f, "{value}"),
            Rank::Float(value) => write!(f, "{value}"),
            Rank::Text(value) => write!(f, "{value}"),
            Rank::Seq(items) => {
                write!(f, "(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
