#![deny(missing_docs)]
#![doc = "Core types for netm: labels, attribute values, ranks, graph metadata and the multigraph capability trait."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod label;
pub mod meta;
pub mod rng;
pub mod value;

pub use errors::{ErrorInfo, NmError};
pub use label::{EdgeTriple, Label};
pub use meta::{GraphMeta, Mapping, RankGroup, Sorting};
pub use rng::{uniform_sampler, RngHandle};
pub use value::{AttrSet, AttrValue, Attrs, Deferred, Rank, Value};

/// Arena slot of a node inside a [`MultiGraph`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Arena slot of an edge inside a [`MultiGraph`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

/// Capability contract for labeled directed multigraphs.
///
/// Node and edge enumeration follows insertion order. Inserting an existing
/// node or edge triple merges the supplied attributes into the stored map.
pub trait MultiGraph: Send + Sync {
    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges.
    fn edge_count(&self) -> usize;

    /// All node labels in iteration order.
    fn node_labels(&self) -> Vec<Label>;

    /// All edge triples in iteration order.
    fn edge_triples(&self) -> Vec<EdgeTriple>;

    /// Whether the node exists.
    fn contains_node(&self, node: &Label) -> bool;

    /// Whether the edge exists.
    fn contains_edge(&self, edge: &EdgeTriple) -> bool;

    /// Attribute map of a node.
    fn node_attrs(&self, node: &Label) -> Result<&Attrs, NmError>;

    /// Mutable attribute map of a node.
    fn node_attrs_mut(&mut self, node: &Label) -> Result<&mut Attrs, NmError>;

    /// Attribute map of an edge.
    fn edge_attrs(&self, edge: &EdgeTriple) -> Result<&Attrs, NmError>;

    /// Mutable attribute map of an edge.
    fn edge_attrs_mut(&mut self, edge: &EdgeTriple) -> Result<&mut Attrs, NmError>;

    /// Inserts a node, merging attributes when it already exists.
    fn add_node(&mut self, node: Label, attrs: Attrs) -> Result<(), NmError>;

    /// Inserts an edge, creating missing endpoints.
    ///
    /// Without a key the first free integer key is chosen. Returns the
    /// identity of the stored edge.
    fn add_edge(
        &mut self,
        source: Label,
        target: Label,
        key: Option<Label>,
        attrs: Attrs,
    ) -> Result<EdgeTriple, NmError>;

    /// Removes a node together with its incident edges, returning its attributes.
    fn remove_node(&mut self, node: &Label) -> Result<Attrs, NmError>;

    /// Removes an edge, returning its attributes.
    fn remove_edge(&mut self, edge: &EdgeTriple) -> Result<Attrs, NmError>;

    /// Distinct heads of the node's outbound edges.
    fn successors(&self, node: &Label) -> Result<Vec<Label>, NmError>;

    /// Distinct tails of the node's inbound edges.
    fn predecessors(&self, node: &Label) -> Result<Vec<Label>, NmError>;

    /// Outbound edges of a node in iteration order.
    fn out_edges(&self, node: &Label) -> Result<Vec<EdgeTriple>, NmError>;

    /// Inbound edges of a node in iteration order.
    fn in_edges(&self, node: &Label) -> Result<Vec<EdgeTriple>, NmError>;

    /// Number of inbound edges.
    fn in_degree(&self, node: &Label) -> Result<usize, NmError> {
        Ok(self.in_edges(node)?.len())
    }

    /// Number of outbound edges.
    fn out_degree(&self, node: &Label) -> Result<usize, NmError> {
        Ok(self.out_edges(node)?.len())
    }

    /// Inbound plus outbound edges; self-loops count twice.
    fn degree(&self, node: &Label) -> Result<usize, NmError> {
        Ok(self.in_degree(node)? + self.out_degree(node)?)
    }

    /// Graph-scoped metadata.
    fn meta(&self) -> &GraphMeta;

    /// Mutable graph-scoped metadata.
    fn meta_mut(&mut self) -> &mut GraphMeta;
}
