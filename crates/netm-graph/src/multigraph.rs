use std::collections::{BTreeMap, BTreeSet};

use netm_core::{Attrs, EdgeId, EdgeTriple, GraphMeta, Label, MultiGraph, NmError, NodeId};

use crate::ids::{edge_index, make_edge, make_node, node_index};

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) alive: bool,
    pub(crate) label: Label,
    pub(crate) attrs: Attrs,
    pub(crate) in_edges: BTreeSet<EdgeId>,
    pub(crate) out_edges: BTreeSet<EdgeId>,
}

impl NodeRecord {
    fn new(label: Label, attrs: Attrs) -> Self {
        Self {
            alive: true,
            label,
            attrs,
            in_edges: BTreeSet::new(),
            out_edges: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord {
    pub(crate) alive: bool,
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) key: Label,
    pub(crate) attrs: Attrs,
}

/// Slot-level identity of an edge; stable across relabels.
pub(crate) type SlotTriple = (NodeId, NodeId, Label);

/// Arena-backed labeled directed multigraph.
///
/// Nodes and edges live in append-only tables addressed by [`NodeId`] and
/// [`EdgeId`]. Removal leaves a dead slot behind; [`MultiDiGraph::compact`]
/// and the sort engine drop dead slots when they rebuild the tables.
#[derive(Debug, Clone, Default)]
pub struct MultiDiGraph {
    pub(crate) nodes: Vec<NodeRecord>,
    pub(crate) edges: Vec<EdgeRecord>,
    pub(crate) labels: BTreeMap<Label, NodeId>,
    pub(crate) triples: BTreeMap<SlotTriple, EdgeId>,
    pub(crate) meta: GraphMeta,
}

impl MultiDiGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from plain node labels and `(source, target)` pairs.
    pub fn from_edges<N, E>(nodes: N, edges: E) -> Result<Self, NmError>
    where
        N: IntoIterator,
        N::Item: Into<Label>,
        E: IntoIterator<Item = (Label, Label)>,
    {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node.into(), Attrs::new())?;
        }
        for (source, target) in edges {
            graph.add_edge(source, target, None, Attrs::new())?;
        }
        Ok(graph)
    }

    /// Returns the arena slot of a node.
    pub fn node_id(&self, node: &Label) -> Result<NodeId, NmError> {
        self.labels.get(node).copied().ok_or_else(|| unknown_node(node))
    }

    /// Returns the arena slot of an edge.
    pub fn edge_id(&self, edge: &EdgeTriple) -> Result<EdgeId, NmError> {
        let source = self.node_id(&edge.source).map_err(|_| unknown_edge(edge))?;
        let target = self.node_id(&edge.target).map_err(|_| unknown_edge(edge))?;
        self.triples
            .get(&(source, target, edge.key.clone()))
            .copied()
            .ok_or_else(|| unknown_edge(edge))
    }

    /// Returns the label stored in a live node slot.
    pub fn label_of(&self, id: NodeId) -> Result<&Label, NmError> {
        Ok(&self.node(id)?.label)
    }

    /// Returns the identity of a live edge slot.
    pub fn triple_of(&self, id: EdgeId) -> Result<EdgeTriple, NmError> {
        let record = self.edge(id)?;
        Ok(self.triple_from_record(record))
    }

    /// Iterates over `(label, attributes)` in node order.
    pub fn nodes_with_attrs(&self) -> impl Iterator<Item = (&Label, &Attrs)> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.alive)
            .map(|node| (&node.label, &node.attrs))
    }

    /// Iterates over `(triple, attributes)` in edge order.
    pub fn edges_with_attrs(&self) -> impl Iterator<Item = (EdgeTriple, &Attrs)> + '_ {
        self.edges
            .iter()
            .filter(|edge| edge.alive)
            .map(|edge| (self.triple_from_record(edge), &edge.attrs))
    }

    /// Drops dead slots while keeping node and edge order.
    pub fn compact(&mut self) {
        let node_order = self.node_ids();
        let edge_order = self.edge_ids();
        self.rebuild_in_order(&node_order, &edge_order);
    }

    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.alive)
            .map(|(idx, _)| make_node(idx))
            .collect()
    }

    pub(crate) fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.alive)
            .map(|(idx, _)| make_edge(idx))
            .collect()
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&NodeRecord, NmError> {
        self.nodes
            .get(node_index(id))
            .filter(|record| record.alive)
            .ok_or_else(|| {
                NmError::lookup("unknown-node", "node slot does not exist")
                    .with_context("slot", id.as_raw())
            })
    }

    pub(crate) fn edge(&self, id: EdgeId) -> Result<&EdgeRecord, NmError> {
        self.edges
            .get(edge_index(id))
            .filter(|record| record.alive)
            .ok_or_else(|| {
                NmError::lookup("unknown-edge", "edge slot does not exist")
                    .with_context("slot", id.as_raw())
            })
    }

    pub(crate) fn triple_from_record(&self, record: &EdgeRecord) -> EdgeTriple {
        EdgeTriple {
            source: self.nodes[node_index(record.source)].label.clone(),
            target: self.nodes[node_index(record.target)].label.clone(),
            key: record.key.clone(),
        }
    }

    /// Replaces both tables with the given live slots in the given order.
    ///
    /// Slots not listed are dropped along with their adjacency entries.
    /// Edges whose endpoints are dropped are dropped too.
    pub(crate) fn rebuild_in_order(&mut self, node_order: &[NodeId], edge_order: &[EdgeId]) {
        let mut remap: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        let mut nodes = Vec::with_capacity(node_order.len());
        for id in node_order {
            let Some(record) = self.nodes.get(node_index(*id)).filter(|r| r.alive) else {
                continue;
            };
            if remap.contains_key(id) {
                continue;
            }
            remap.insert(*id, make_node(nodes.len()));
            nodes.push(NodeRecord::new(record.label.clone(), record.attrs.clone()));
        }
        let mut edges = Vec::with_capacity(edge_order.len());
        for id in edge_order {
            let Some(record) = self.edges.get(edge_index(*id)).filter(|r| r.alive) else {
                continue;
            };
            let (Some(source), Some(target)) = (remap.get(&record.source), remap.get(&record.target))
            else {
                continue;
            };
            edges.push(EdgeRecord {
                alive: true,
                source: *source,
                target: *target,
                key: record.key.clone(),
                attrs: record.attrs.clone(),
            });
        }
        self.nodes = nodes;
        self.edges = edges;
        self.reindex();
    }

    /// Recomputes label, triple and adjacency indexes from the tables.
    pub(crate) fn reindex(&mut self) {
        self.labels.clear();
        self.triples.clear();
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            node.in_edges.clear();
            node.out_edges.clear();
            if node.alive {
                self.labels.insert(node.label.clone(), make_node(idx));
            }
        }
        for (idx, edge) in self.edges.iter().enumerate() {
            if !edge.alive {
                continue;
            }
            let id = make_edge(idx);
            self.nodes[node_index(edge.source)].out_edges.insert(id);
            self.nodes[node_index(edge.target)].in_edges.insert(id);
            self.triples
                .insert((edge.source, edge.target, edge.key.clone()), id);
        }
    }

    fn ensure_node(&mut self, node: Label) -> NodeId {
        if let Some(id) = self.labels.get(&node) {
            return *id;
        }
        let id = make_node(self.nodes.len());
        self.labels.insert(node.clone(), id);
        self.nodes.push(NodeRecord::new(node, Attrs::new()));
        id
    }

    fn free_key(&self, source: NodeId, target: NodeId) -> Label {
        let parallel = self.nodes[node_index(source)]
            .out_edges
            .iter()
            .filter(|edge| self.edges[edge_index(**edge)].target == target)
            .count();
        let mut key = parallel as i64;
        while self
            .triples
            .contains_key(&(source, target, Label::Int(key)))
        {
            key += 1;
        }
        Label::Int(key)
    }

    fn detach_edge(&mut self, id: EdgeId) -> Attrs {
        let record = &mut self.edges[edge_index(id)];
        record.alive = false;
        let attrs = std::mem::take(&mut record.attrs);
        let (source, target, key) = (record.source, record.target, record.key.clone());
        self.triples.remove(&(source, target, key));
        self.nodes[node_index(source)].out_edges.remove(&id);
        self.nodes[node_index(target)].in_edges.remove(&id);
        attrs
    }

    fn edges_to_triples(&self, ids: impl Iterator<Item = EdgeId>) -> Vec<EdgeTriple> {
        ids.map(|id| self.triple_from_record(&self.edges[edge_index(id)]))
            .collect()
    }
}

impl MultiGraph for MultiDiGraph {
    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn edge_count(&self) -> usize {
        self.triples.len()
    }

    fn node_labels(&self) -> Vec<Label> {
        self.nodes
            .iter()
            .filter(|node| node.alive)
            .map(|node| node.label.clone())
            .collect()
    }

    fn edge_triples(&self) -> Vec<EdgeTriple> {
        self.edges
            .iter()
            .filter(|edge| edge.alive)
            .map(|edge| self.triple_from_record(edge))
            .collect()
    }

    fn contains_node(&self, node: &Label) -> bool {
        self.labels.contains_key(node)
    }

    fn contains_edge(&self, edge: &EdgeTriple) -> bool {
        self.edge_id(edge).is_ok()
    }

    fn node_attrs(&self, node: &Label) -> Result<&Attrs, NmError> {
        let id = self.node_id(node)?;
        Ok(&self.nodes[node_index(id)].attrs)
    }

    fn node_attrs_mut(&mut self, node: &Label) -> Result<&mut Attrs, NmError> {
        let id = self.node_id(node)?;
        Ok(&mut self.nodes[node_index(id)].attrs)
    }

    fn edge_attrs(&self, edge: &EdgeTriple) -> Result<&Attrs, NmError> {
        let id = self.edge_id(edge)?;
        Ok(&self.edges[edge_index(id)].attrs)
    }

    fn edge_attrs_mut(&mut self, edge: &EdgeTriple) -> Result<&mut Attrs, NmError> {
        let id = self.edge_id(edge)?;
        Ok(&mut self.edges[edge_index(id)].attrs)
    }

    fn add_node(&mut self, node: Label, attrs: Attrs) -> Result<(), NmError> {
        let id = self.ensure_node(node);
        self.nodes[node_index(id)].attrs.extend(attrs);
        Ok(())
    }

    fn add_edge(
        &mut self,
        source: Label,
        target: Label,
        key: Option<Label>,
        attrs: Attrs,
    ) -> Result<EdgeTriple, NmError> {
        let source_id = self.ensure_node(source);
        let target_id = self.ensure_node(target);
        let key = key.unwrap_or_else(|| self.free_key(source_id, target_id));
        let slot = (source_id, target_id, key.clone());
        if let Some(existing) = self.triples.get(&slot) {
            self.edges[edge_index(*existing)].attrs.extend(attrs);
        } else {
            let id = make_edge(self.edges.len());
            self.edges.push(EdgeRecord {
                alive: true,
                source: source_id,
                target: target_id,
                key,
                attrs,
            });
            self.nodes[node_index(source_id)].out_edges.insert(id);
            self.nodes[node_index(target_id)].in_edges.insert(id);
            self.triples.insert(slot.clone(), id);
        }
        Ok(EdgeTriple {
            source: self.nodes[node_index(slot.0)].label.clone(),
            target: self.nodes[node_index(slot.1)].label.clone(),
            key: slot.2,
        })
    }

    fn remove_node(&mut self, node: &Label) -> Result<Attrs, NmError> {
        let id = self.node_id(node)?;
        let record = &self.nodes[node_index(id)];
        let incident: BTreeSet<EdgeId> = record
            .in_edges
            .iter()
            .chain(record.out_edges.iter())
            .copied()
            .collect();
        for edge in incident {
            self.detach_edge(edge);
        }
        self.labels.remove(node);
        let record = &mut self.nodes[node_index(id)];
        record.alive = false;
        Ok(std::mem::take(&mut record.attrs))
    }

    fn remove_edge(&mut self, edge: &EdgeTriple) -> Result<Attrs, NmError> {
        let id = self.edge_id(edge)?;
        Ok(self.detach_edge(id))
    }

    fn successors(&self, node: &Label) -> Result<Vec<Label>, NmError> {
        let record = self.node(self.node_id(node)?)?;
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for edge in &record.out_edges {
            let target = self.edges[edge_index(*edge)].target;
            if seen.insert(target) {
                out.push(self.nodes[node_index(target)].label.clone());
            }
        }
        Ok(out)
    }

    fn predecessors(&self, node: &Label) -> Result<Vec<Label>, NmError> {
        let record = self.node(self.node_id(node)?)?;
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for edge in &record.in_edges {
            let source = self.edges[edge_index(*edge)].source;
            if seen.insert(source) {
                out.push(self.nodes[node_index(source)].label.clone());
            }
        }
        Ok(out)
    }

    fn out_edges(&self, node: &Label) -> Result<Vec<EdgeTriple>, NmError> {
        let record = self.node(self.node_id(node)?)?;
        Ok(self.edges_to_triples(record.out_edges.iter().copied()))
    }

    fn in_edges(&self, node: &Label) -> Result<Vec<EdgeTriple>, NmError> {
        let record = self.node(self.node_id(node)?)?;
        Ok(self.edges_to_triples(record.in_edges.iter().copied()))
    }

    fn in_degree(&self, node: &Label) -> Result<usize, NmError> {
        Ok(self.node(self.node_id(node)?)?.in_edges.len())
    }

    fn out_degree(&self, node: &Label) -> Result<usize, NmError> {
        Ok(self.node(self.node_id(node)?)?.out_edges.len())
    }

    fn meta(&self) -> &GraphMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut GraphMeta {
        &mut self.meta
    }
}

fn unknown_node(node: &Label) -> NmError {
    NmError::lookup("unknown-node", "node does not exist").with_context("node", node)
}

fn unknown_edge(edge: &EdgeTriple) -> NmError {
    NmError::lookup("unknown-edge", "edge does not exist").with_context("edge", edge)
}
