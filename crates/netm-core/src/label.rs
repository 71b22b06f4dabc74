//! Node labels and edge identities.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Hashable, totally ordered node label. Also used for multi-edge keys.
///
/// Integers order before strings so ordinal relabelings sort naturally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer label.
    Int(i64),
    /// String label.
    Str(String),
}

impl Label {
    /// Returns the integer payload when the label is numeric.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Label::Int(value) => Some(*value),
            Label::Str(_) => None,
        }
    }

    /// Returns `true` when the label is numeric.
    pub fn is_int(&self) -> bool {
        matches!(self, Label::Int(_))
    }
}

impl Default for Label {
    fn default() -> Self {
        Label::Int(0)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(value) => write!(f, "{value}"),
            Label::Str(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Int(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Int(i64::from(value))
    }
}

impl From<usize> for Label {
    fn from(value: usize) -> Self {
        Label::Int(value as i64)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Str(value)
    }
}

impl From<&Label> for Label {
    fn from(value: &Label) -> Self {
        value.clone()
    }
}

/// Identity of an edge inside a directed multigraph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeTriple {
    /// Tail of the edge.
    pub source: Label,
    /// Head of the edge.
    pub target: Label,
    /// Disambiguates parallel edges between the same ordered pair.
    pub key: Label,
}

impl EdgeTriple {
    /// Creates a triple from anything convertible into labels.
    pub fn new(source: impl Into<Label>, target: impl Into<Label>, key: impl Into<Label>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            key: key.into(),
        }
    }

    /// Returns the triple with source and target swapped.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            key: self.key.clone(),
        }
    }
}

impl<S, T, K> From<(S, T, K)> for EdgeTriple
where
    S: Into<Label>,
    T: Into<Label>,
    K: Into<Label>,
{
    fn from((source, target, key): (S, T, K)) -> Self {
        EdgeTriple::new(source, target, key)
    }
}

impl Display for EdgeTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.target, self.key)
    }
}
