use netm_core::{EdgeId, NodeId};

/// Converts a [`NodeId`] into its slot within the node arena.
pub(crate) fn node_index(id: NodeId) -> usize {
    id.as_raw() as usize
}

/// Converts an [`EdgeId`] into its slot within the edge arena.
pub(crate) fn edge_index(id: EdgeId) -> usize {
    id.as_raw() as usize
}

/// Creates a [`NodeId`] from an arena slot.
pub(crate) fn make_node(index: usize) -> NodeId {
    NodeId::from_raw(index as u64)
}

/// Creates an [`EdgeId`] from an arena slot.
pub(crate) fn make_edge(index: usize) -> EdgeId {
    EdgeId::from_raw(index as u64)
}
