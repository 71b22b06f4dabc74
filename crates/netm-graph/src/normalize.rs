//! Canonicalization of edge and length arguments.

use std::collections::BTreeMap;

use netm_core::{Attrs, EdgeTriple, Label, MultiGraph, NmError, Value};

/// A single edge as written by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeSpec {
    /// `(source, target)`; the key is filled in during normalization.
    Pair(Label, Label),
    /// `(source, target, key)`.
    Triple(Label, Label, Label),
    /// `(source, target, key, data)`; the payload is discarded on normalization.
    WithData(Label, Label, Label, Attrs),
}

impl EdgeSpec {
    /// Canonical triple, filling a missing key with `default_key`.
    pub fn to_triple(&self, default_key: &Label) -> EdgeTriple {
        match self {
            EdgeSpec::Pair(source, target) => {
                EdgeTriple::new(source.clone(), target.clone(), default_key.clone())
            }
            EdgeSpec::Triple(source, target, key) | EdgeSpec::WithData(source, target, key, _) => {
                EdgeTriple::new(source.clone(), target.clone(), key.clone())
            }
        }
    }
}

impl TryFrom<Vec<Label>> for EdgeSpec {
    type Error = NmError;

    fn try_from(parts: Vec<Label>) -> Result<Self, Self::Error> {
        let arity = parts.len();
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next(), arity) {
            (Some(source), Some(target), None, 2) => Ok(EdgeSpec::Pair(source, target)),
            (Some(source), Some(target), Some(key), 3) => {
                Ok(EdgeSpec::Triple(source, target, key))
            }
            _ => Err(NmError::malformed(
                "edge-arity",
                "edge specification must have a source, a target and an optional key",
            )
            .with_context("arity", arity)),
        }
    }
}

impl<S: Into<Label>, T: Into<Label>> From<(S, T)> for EdgeSpec {
    fn from((source, target): (S, T)) -> Self {
        EdgeSpec::Pair(source.into(), target.into())
    }
}

impl<S: Into<Label>, T: Into<Label>, K: Into<Label>> From<(S, T, K)> for EdgeSpec {
    fn from((source, target, key): (S, T, K)) -> Self {
        EdgeSpec::Triple(source.into(), target.into(), key.into())
    }
}

impl From<EdgeTriple> for EdgeSpec {
    fn from(edge: EdgeTriple) -> Self {
        EdgeSpec::Triple(edge.source, edge.target, edge.key)
    }
}

/// Which edges an operation targets.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EdgeSelection {
    /// Every edge of the graph, in iteration order.
    #[default]
    All,
    /// A single edge.
    One(EdgeSpec),
    /// An explicit list of edges.
    Many(Vec<EdgeSpec>),
}

impl EdgeSelection {
    /// Builds a selection from anything convertible into edge specs.
    pub fn of<I, E>(edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        EdgeSelection::Many(edges.into_iter().map(Into::into).collect())
    }
}

impl From<EdgeSpec> for EdgeSelection {
    fn from(spec: EdgeSpec) -> Self {
        EdgeSelection::One(spec)
    }
}

impl From<Vec<EdgeSpec>> for EdgeSelection {
    fn from(specs: Vec<EdgeSpec>) -> Self {
        EdgeSelection::Many(specs)
    }
}

/// Resolves a selection into canonical triples, preserving order.
pub fn normalize_edges<G: MultiGraph + ?Sized>(
    graph: &G,
    selection: &EdgeSelection,
    default_key: &Label,
) -> Vec<EdgeTriple> {
    match selection {
        EdgeSelection::All => graph.edge_triples(),
        EdgeSelection::One(spec) => vec![spec.to_triple(default_key)],
        EdgeSelection::Many(specs) => specs.iter().map(|spec| spec.to_triple(default_key)).collect(),
    }
}

/// Path lengths requested for a set of edges.
#[derive(Debug, Clone, PartialEq)]
pub enum Lengths {
    /// The same length for every edge.
    Uniform(usize),
    /// An explicit length per edge; unlisted edges have no length.
    PerEdge(BTreeMap<EdgeTriple, usize>),
    /// Read from the named edge attribute.
    Attribute(String),
}

impl Default for Lengths {
    fn default() -> Self {
        Lengths::Uniform(1)
    }
}

/// Per-edge lengths; `None` marks an edge whose length could not be resolved.
pub type LengthTable = BTreeMap<EdgeTriple, Option<usize>>;

/// Resolves `lengths` for each edge. Lookup failures yield `None`.
pub fn normalize_lengths<G: MultiGraph + ?Sized>(
    graph: &G,
    edges: &[EdgeTriple],
    lengths: &Lengths,
) -> LengthTable {
    edges
        .iter()
        .map(|edge| {
            let length = match lengths {
                Lengths::Uniform(length) => Some(*length),
                Lengths::PerEdge(table) => table.get(edge).copied(),
                Lengths::Attribute(name) => graph
                    .edge_attrs(edge)
                    .ok()
                    .and_then(|attrs| attrs.get(name))
                    .and_then(length_from_value),
            };
            (edge.clone(), length)
        })
        .collect()
}

fn length_from_value(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|length| usize::try_from(length).ok())
}
