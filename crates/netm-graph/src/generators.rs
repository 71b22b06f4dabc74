use netm_core::{Attrs, Label, MultiGraph, NmError};
use serde::{Deserialize, Serialize};

use crate::multigraph::MultiDiGraph;

/// Shape of a ring topology built by [`ring`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingOptions {
    /// Number of nodes, labeled `0..nodes`.
    pub nodes: usize,
    /// Add `i -> i-1` edges.
    pub left: bool,
    /// Add `i -> i+1` edges.
    pub right: bool,
    /// Add `i -> i` edges.
    pub self_loops: bool,
}

impl Default for RingOptions {
    fn default() -> Self {
        Self {
            nodes: 3,
            left: true,
            right: false,
            self_loops: false,
        }
    }
}

/// Builds a ring of `options.nodes` integer-labeled nodes.
///
/// All left edges are inserted before all right edges, which are inserted
/// before all self loops.
pub fn ring(options: RingOptions) -> Result<MultiDiGraph, NmError> {
    let n = options.nodes;
    let mut graph = MultiDiGraph::new();
    for node in 0..n {
        graph.add_node(Label::from(node), Attrs::new())?;
    }
    if n == 0 {
        return Ok(graph);
    }
    let mut edges: Vec<(usize, usize)> = Vec::new();
    if options.left {
        edges.extend((0..n).map(|i| (i, (i + n - 1) % n)));
    }
    if options.right {
        edges.extend((0..n).map(|i| (i, (i + 1) % n)));
    }
    if options.self_loops {
        edges.extend((0..n).map(|i| (i, i)));
    }
    for (source, target) in edges {
        graph.add_edge(Label::from(source), Label::from(target), None, Attrs::new())?;
    }
    Ok(graph)
}
