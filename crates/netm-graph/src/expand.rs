//! Edge-to-path-tree expansion.

use std::collections::{BTreeMap, BTreeSet};

use netm_core::{EdgeTriple, Label, MultiGraph, NmError};
use tracing::{debug, instrument, warn};

use crate::attrs::resolve_attrs;
use crate::normalize::{normalize_edges, normalize_lengths, EdgeSelection, Lengths};
use crate::options::ExpandOptions;

/// What a call to [`convert_edges`] changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionSummary {
    /// Fresh trunk nodes per root, in path order.
    pub trunks: BTreeMap<Label, Vec<Label>>,
    /// Original edges removed from the graph.
    pub removed: Vec<EdgeTriple>,
    /// Selected edges left untouched because their length is unknown.
    pub skipped: Vec<EdgeTriple>,
}

impl ExpansionSummary {
    /// Total number of nodes inserted.
    pub fn nodes_added(&self) -> usize {
        self.trunks.values().map(Vec::len).sum()
    }
}

/// Replaces the selected edges with trees of fresh nodes.
///
/// Each edge `(r, leaf)` of length `l` becomes a path of exactly `l` edges
/// from `r` to `leaf`. Edges sharing a root share one trunk of
/// `max(l) - 1` fresh nodes; shorter edges branch off the trunk at depth
/// `l - 1`. Trunk nodes and edges receive `options.node_data` and
/// `options.edge_data`; each branch edge receives a copy of the attributes of
/// the edge it replaces. Edges of length 0 are removed outright and edges of
/// length 1 are kept as they are.
///
/// Roots are processed longest trunk first. The graph is mutated root by
/// root and is not restored if a later root fails.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn convert_edges<G: MultiGraph>(
    graph: &mut G,
    selection: &EdgeSelection,
    lengths: &Lengths,
    options: &ExpandOptions,
) -> Result<ExpansionSummary, NmError> {
    let mut seen = BTreeSet::new();
    let edges: Vec<EdgeTriple> = normalize_edges(&*graph, selection, &options.default_key)
        .into_iter()
        .filter(|edge| seen.insert(edge.clone()))
        .collect();
    if let Some(missing) = edges.iter().find(|edge| !graph.contains_edge(edge)) {
        return Err(NmError::lookup("unknown-edge", "selected edge does not exist")
            .with_context("edge", missing));
    }
    let table = normalize_lengths(&*graph, &edges, lengths);

    let mut summary = ExpansionSummary::default();
    let mut expandable: Vec<(EdgeTriple, usize)> = Vec::new();
    for edge in edges {
        match table.get(&edge).copied().flatten() {
            Some(length) => expandable.push((edge, length)),
            None => {
                warn!(edge = %edge, "edge has no resolvable length; left in place");
                summary.skipped.push(edge);
            }
        }
    }

    let mut roots: Vec<Label> = Vec::new();
    let mut trunk_lengths: BTreeMap<Label, usize> = BTreeMap::new();
    for (edge, length) in &expandable {
        let entry = trunk_lengths.entry(edge.source.clone()).or_insert_with(|| {
            roots.push(edge.source.clone());
            0
        });
        *entry = (*entry).max(*length);
    }
    roots.sort_by(|a, b| trunk_lengths[b].cmp(&trunk_lengths[a]));

    let mut kept: BTreeSet<EdgeTriple> = BTreeSet::new();
    for root in &roots {
        let trunk_length = trunk_lengths[root];
        let trunk = fresh_labels(&*graph, root, trunk_length.saturating_sub(1), options)?;

        let node_attrs = resolve_attrs(&options.node_data);
        let edge_attrs = resolve_attrs(&options.edge_data);
        for node in &trunk {
            graph.add_node(node.clone(), node_attrs.clone())?;
        }
        let path: Vec<Label> = std::iter::once(root.clone())
            .chain(trunk.iter().cloned())
            .collect();
        for pair in path.windows(2) {
            graph.add_edge(pair[0].clone(), pair[1].clone(), None, edge_attrs.clone())?;
        }

        for (edge, length) in expandable.iter().filter(|(edge, _)| &edge.source == root) {
            match *length {
                0 => {}
                1 => {
                    kept.insert(edge.clone());
                }
                length => {
                    let anchor = path[length - 1].clone();
                    let attrs = graph.edge_attrs(edge)?.clone();
                    graph.add_edge(anchor, edge.target.clone(), None, attrs)?;
                }
            }
        }
        debug!(root = %root, trunk_length, fresh = trunk.len(), "trunk built");
        summary.trunks.insert(root.clone(), trunk);
    }

    for (edge, _) in expandable {
        if kept.contains(&edge) {
            continue;
        }
        graph.remove_edge(&edge)?;
        summary.removed.push(edge);
    }
    debug!(
        added = summary.nodes_added(),
        removed = summary.removed.len(),
        skipped = summary.skipped.len(),
        "edges converted"
    );
    Ok(summary)
}

fn fresh_labels<G: MultiGraph>(
    graph: &G,
    root: &Label,
    count: usize,
    options: &ExpandOptions,
) -> Result<Vec<Label>, NmError> {
    let Some(label) = &options.label else {
        // Integer labels with gaps can put `node_count` on a live node.
        let mut next = graph.node_count();
        let mut labels = Vec::with_capacity(count);
        while labels.len() < count {
            let candidate = Label::from(next);
            next += 1;
            if !graph.contains_node(&candidate) {
                labels.push(candidate);
            }
        }
        return Ok(labels);
    };
    let labels: Vec<Label> = (0..count).map(|index| label(graph, root, index)).collect();
    let mut unique = BTreeSet::new();
    for label in &labels {
        if graph.contains_node(label) || !unique.insert(label) {
            return Err(
                NmError::graph("label-collision", "fresh node label is already in use")
                    .with_context("label", label)
                    .with_context("root", root)
                    .with_hint("supply a labeling function that yields unused labels"),
            );
        }
    }
    Ok(labels)
}
