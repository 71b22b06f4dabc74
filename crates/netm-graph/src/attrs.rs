//! Bulk attribute assignment for nodes and edges.

use std::collections::BTreeMap;

use netm_core::{AttrSet, Attrs, EdgeTriple, Label, MultiGraph, NmError};
use tracing::debug;

use crate::normalize::{normalize_edges, EdgeSelection};

/// Evaluates every value of `values` once, deferred computations included.
pub fn resolve_attrs(values: &AttrSet) -> Attrs {
    values
        .iter()
        .map(|(name, value)| (name.clone(), value.resolve()))
        .collect()
}

/// Applies `values` to `nodes` (every node when `None`).
///
/// Deferred values are evaluated once, so every target receives the same
/// resolved value. Unknown nodes are a lookup error.
pub fn give_nodes<G: MultiGraph + ?Sized>(
    graph: &mut G,
    nodes: Option<&[Label]>,
    values: &AttrSet,
) -> Result<(), NmError> {
    if values.is_empty() {
        return Ok(());
    }
    let targets = match nodes {
        Some(nodes) => nodes.to_vec(),
        None => graph.node_labels(),
    };
    let resolved = resolve_attrs(values);
    for node in &targets {
        graph.node_attrs_mut(node)?.extend(resolved.clone());
    }
    debug!(targets = targets.len(), names = resolved.len(), "node attributes applied");
    Ok(())
}

/// Applies `values` to every edge in `selection`.
///
/// Pairs without a key address key `0`. Unknown edges are a lookup error.
pub fn give_edges<G: MultiGraph + ?Sized>(
    graph: &mut G,
    selection: &EdgeSelection,
    values: &AttrSet,
) -> Result<(), NmError> {
    if values.is_empty() {
        return Ok(());
    }
    let targets = normalize_edges(&*graph, selection, &Label::Int(0));
    let resolved = resolve_attrs(values);
    for edge in &targets {
        graph.edge_attrs_mut(edge)?.extend(resolved.clone());
    }
    debug!(targets = targets.len(), names = resolved.len(), "edge attributes applied");
    Ok(())
}

/// Applies a per-node attribute set. Nodes missing from the graph are skipped.
///
/// Returns the number of nodes updated.
pub fn give_node_data<G: MultiGraph + ?Sized>(
    graph: &mut G,
    data: &BTreeMap<Label, AttrSet>,
) -> usize {
    let mut applied = 0;
    for (node, values) in data {
        if let Ok(attrs) = graph.node_attrs_mut(node) {
            attrs.extend(resolve_attrs(values));
            applied += 1;
        }
    }
    debug!(applied, skipped = data.len() - applied, "per-node attributes applied");
    applied
}

/// Applies a per-edge attribute set. Edges missing from the graph are skipped.
///
/// Returns the number of edges updated.
pub fn give_edge_data<G: MultiGraph + ?Sized>(
    graph: &mut G,
    data: &BTreeMap<EdgeTriple, AttrSet>,
) -> usize {
    let mut applied = 0;
    for (edge, values) in data {
        if let Ok(attrs) = graph.edge_attrs_mut(edge) {
            attrs.extend(resolve_attrs(values));
            applied += 1;
        }
    }
    debug!(applied, skipped = data.len() - applied, "per-edge attributes applied");
    applied
}
