#![deny(missing_docs)]

//! Labeled directed multigraph implementing the `netm-core` contracts, with
//! edge-to-path expansion, relabeling and rank-grouped sorting.

mod attrs;
mod expand;
mod generators;
mod ids;
mod multigraph;
mod normalize;
mod options;
mod query;
mod relabel;
mod sort;
mod table;

pub use attrs::{give_edge_data, give_edges, give_node_data, give_nodes, resolve_attrs};
pub use expand::{convert_edges, ExpansionSummary};
pub use generators::{ring, RingOptions};
pub use multigraph::MultiDiGraph;
pub use normalize::{
    normalize_edges, normalize_lengths, EdgeSelection, EdgeSpec, LengthTable, Lengths,
};
pub use options::{
    EdgeCriterion, EdgeFn, EdgeKeyFn, ExpandOptions, LabelFn, NodeCriterion, NodeFn, NodeKeyFn,
    SortConfig, SortOptions,
};
pub use query::{edge_attr_names, edge_data, edges_where, node_attr_names, node_data, nodes_where};
pub use relabel::{ordinal_mapping, relabel_graph, KeyReservations, RelabelOutcome, Relabeling};
pub use sort::sort_graph;
pub use table::{print_graph, table};
