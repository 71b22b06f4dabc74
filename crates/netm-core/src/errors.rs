//! Structured error types shared across netm crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`NmError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (labels, arities, names).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for netm.
///
/// Key collisions produced while relabeling are always resolved locally and
/// therefore have no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NmError {
    /// A node, edge, attribute or criterion referenced by name does not exist.
    #[error("lookup error: {0}")]
    Lookup(ErrorInfo),
    /// An edge or length specification of unexpected shape.
    #[error("malformed specification: {0}")]
    Malformed(ErrorInfo),
    /// Structural conflicts inside the graph container.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl NmError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NmError::Lookup(info) | NmError::Malformed(info) | NmError::Graph(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Shorthand for a [`NmError::Lookup`] with the given code and message.
    pub fn lookup(code: impl Into<String>, message: impl Into<String>) -> Self {
        NmError::Lookup(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`NmError::Malformed`] with the given code and message.
    pub fn malformed(code: impl Into<String>, message: impl Into<String>) -> Self {
        NmError::Malformed(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`NmError::Graph`] with the given code and message.
    pub fn graph(code: impl Into<String>, message: impl Into<String>) -> Self {
        NmError::Graph(ErrorInfo::new(code, message))
    }

    /// Adds a context entry to the wrapped payload.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Sets a remediation hint on the wrapped payload.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            NmError::Lookup(info) => NmError::Lookup(f(info)),
            NmError::Malformed(info) => NmError::Malformed(f(info)),
            NmError::Graph(info) => NmError::Graph(f(info)),
        }
    }
}
