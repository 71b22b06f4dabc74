//! In-place node relabeling with multi-edge key collision resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use netm_core::{Label, Mapping, MultiGraph, NodeId};
use tracing::{debug, instrument};

use crate::ids::{edge_index, node_index};
use crate::multigraph::MultiDiGraph;

/// Target labeling for [`relabel_graph`].
pub enum Relabeling {
    /// Explicit `old -> new` table.
    Map(Mapping),
    /// Computes the table from the current graph.
    With(Box<dyn FnOnce(&MultiDiGraph) -> Mapping>),
}

impl Relabeling {
    /// Table computed from the graph at call time.
    pub fn with<F>(func: F) -> Self
    where
        F: FnOnce(&MultiDiGraph) -> Mapping + 'static,
    {
        Relabeling::With(Box::new(func))
    }
}

impl From<Mapping> for Relabeling {
    fn from(mapping: Mapping) -> Self {
        Relabeling::Map(mapping)
    }
}

impl fmt::Debug for Relabeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relabeling::Map(mapping) => f.debug_tuple("Map").field(mapping).finish(),
            Relabeling::With(_) => f.write_str("With(<fn>)"),
        }
    }
}

/// What a call to [`relabel_graph`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelabelOutcome {
    /// Nodes folded into another node that received the same label.
    pub merged_nodes: usize,
    /// Edges whose key changed to avoid a duplicate triple.
    pub rekeyed_edges: usize,
}

/// Tracks `(source, target, key)` triples handed out during one rebuild.
///
/// In symmetric mode the reverse triple is reserved as well, which is what
/// undirected multigraphs need.
#[derive(Debug, Clone)]
pub struct KeyReservations<N: Ord + Clone> {
    seen: BTreeSet<(N, N, Label)>,
    symmetric: bool,
}

impl<N: Ord + Clone> KeyReservations<N> {
    /// Creates an empty reservation table.
    pub fn new(symmetric: bool) -> Self {
        Self {
            seen: BTreeSet::new(),
            symmetric,
        }
    }

    /// Reserves the first free key starting from `key`.
    ///
    /// A taken numeric key is incremented; a taken non-numeric key restarts
    /// the search at `1`.
    pub fn reserve(&mut self, source: N, target: N, key: Label) -> Label {
        let mut key = key;
        while self
            .seen
            .contains(&(source.clone(), target.clone(), key.clone()))
        {
            key = match key {
                Label::Int(value) => Label::Int(value + 1),
                Label::Str(_) => Label::Int(1),
            };
        }
        if self.symmetric {
            self.seen
                .insert((target.clone(), source.clone(), key.clone()));
        }
        self.seen.insert((source, target, key.clone()));
        key
    }
}

/// Renames every node in place.
///
/// Without a mapping, the mapping stored by the previous call is reused, so
/// a second bare call restores the earlier labels; on a graph that was never
/// relabeled the nodes get their ordinal position instead. Nodes absent from
/// the mapping keep their label. Nodes that end up sharing a label merge into
/// the first of them, taking the attributes of the last.
///
/// Afterwards `meta.inverse_mapping` holds the applied mapping and
/// `meta.mapping` its inverse.
#[instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn relabel_graph(graph: &mut MultiDiGraph, mapping: Option<Relabeling>) -> RelabelOutcome {
    let mapping = match mapping {
        Some(Relabeling::Map(mapping)) => mapping,
        Some(Relabeling::With(func)) => func(graph),
        None => match graph.meta.mapping.as_ref().filter(|m| !m.is_empty()) {
            Some(stored) => stored.clone(),
            None => ordinal_mapping(graph),
        },
    };
    let inverse: Mapping = mapping
        .iter()
        .map(|(old, new)| (new.clone(), old.clone()))
        .collect();

    let mut outcome = RelabelOutcome::default();
    let mut survivors: BTreeMap<Label, NodeId> = BTreeMap::new();
    let mut redirect: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    for id in graph.node_ids() {
        let old = graph.nodes[node_index(id)].label.clone();
        let new = mapping.get(&old).cloned().unwrap_or(old);
        match survivors.get(&new) {
            Some(&survivor) => {
                let record = &mut graph.nodes[node_index(id)];
                record.alive = false;
                let attrs = std::mem::take(&mut record.attrs);
                graph.nodes[node_index(survivor)].attrs = attrs;
                redirect.insert(id, survivor);
                outcome.merged_nodes += 1;
            }
            None => {
                graph.nodes[node_index(id)].label = new.clone();
                survivors.insert(new, id);
                redirect.insert(id, id);
            }
        }
    }

    let mut reservations = KeyReservations::new(false);
    for id in graph.edge_ids() {
        let record = &mut graph.edges[edge_index(id)];
        record.source = redirect[&record.source];
        record.target = redirect[&record.target];
        let key = reservations.reserve(record.source, record.target, record.key.clone());
        if key != record.key {
            record.key = key;
            outcome.rekeyed_edges += 1;
        }
    }
    graph.reindex();

    debug!(
        mapped = mapping.len(),
        merged = outcome.merged_nodes,
        rekeyed = outcome.rekeyed_edges,
        "graph relabeled"
    );
    graph.meta.mapping = Some(inverse);
    graph.meta.inverse_mapping = Some(mapping);
    outcome
}

/// Maps every node to its position in iteration order.
pub fn ordinal_mapping(graph: &MultiDiGraph) -> Mapping {
    graph
        .node_labels()
        .into_iter()
        .enumerate()
        .map(|(position, node)| (node, Label::from(position)))
        .collect()
}
